//! Line-oriented console
//!
//! Reads one command per line, splits it on whitespace, dispatches it and
//! writes the reply the way redis-cli renders it. `QUIT` or `EXIT` ends the
//! session, as does end of input.

use crate::dispatch::Dispatcher;
use crate::protocol::RespValue;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Run a console session until QUIT / EXIT or end of input
pub async fn run<R, W>(mut dispatcher: Dispatcher, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0usize;

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            continue;
        };

        if first.eq_ignore_ascii_case("QUIT") || first.eq_ignore_ascii_case("EXIT") {
            writer.write_all(b"OK\n").await?;
            break;
        }

        let reply = dispatcher.dispatch_words(&words);
        if reply.is_error() {
            debug!("Command returned an error: {}", line);
        }

        writer.write_all(format_reply(&reply).as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        handled += 1;
    }

    writer.flush().await?;
    info!("Console session closed after {} commands", handled);
    Ok(())
}

/// Render a reply the way redis-cli does
pub fn format_reply(value: &RespValue) -> String {
    render(value, 0)
}

fn render(value: &RespValue, indent: usize) -> String {
    match value {
        RespValue::SimpleString(s) => s.clone(),
        RespValue::Error(e) => format!("(error) {}", e),
        RespValue::Integer(i) => format!("(integer) {}", i),
        RespValue::BulkString(bytes) => format!("{:?}", String::from_utf8_lossy(bytes)),
        RespValue::Null => "(nil)".to_string(),
        RespValue::Array(arr) if arr.is_empty() => "(empty array)".to_string(),
        RespValue::Array(arr) => {
            // Nested arrays line up under their parent's first item
            let width = arr.len().to_string().len();
            arr.iter()
                .enumerate()
                .map(|(i, item)| {
                    let prefix = format!("{:>width$}) ", i + 1, width = width);
                    let body = render(item, indent + prefix.len());
                    let pad = if i == 0 { 0 } else { indent };
                    format!("{}{}{}", " ".repeat(pad), prefix, body)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
