// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::error::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub const PROMPT: &str = "-> Press Return key to continue.";

/// Block until the user presses Return. End of input counts as Return.
pub async fn wait_for_return<R, W>(reader: &mut R, writer: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(PROMPT.as_bytes()).await?;
    writer.flush().await?;

    let mut line = String::new();
    reader.read_line(&mut line).await?;

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
