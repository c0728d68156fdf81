//! Stdin pump.
//!
//! Runs on the tokio runtime, splits stdin into status lines and forwards
//! each complete line to the event loop. Partial lines never leave this
//! task.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use winit::event_loop::EventLoopProxy;

use lbar_core::{InputEvent, LineAccumulator};

use crate::messages::BarEvent;

const READ_CHUNK: usize = 4096;

/// Spawn the stdin reader. It ends at EOF or when the event loop is gone.
pub fn spawn_stdin_pump(
    rt: &Handle,
    proxy: EventLoopProxy<BarEvent>,
    lines: LineAccumulator,
) -> JoinHandle<()> {
    rt.spawn(async move {
        pump(tokio::io::stdin(), lines, |event| proxy.send_event(event).is_ok()).await;
    })
}

/// Read `reader` to EOF, delivering lines through `deliver`.
///
/// `deliver` returns `false` once the receiver is gone; pumping stops there.
/// `BarEvent::InputClosed` is delivered last unless delivery already failed.
pub async fn pump<R, F>(mut reader: R, mut lines: LineAccumulator, mut deliver: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(BarEvent) -> bool,
{
    let mut chunk = vec![0u8; READ_CHUNK];
    let mut events = Vec::new();

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };

        lines.feed(&chunk[..n], &mut events);

        for event in events.drain(..) {
            match event {
                InputEvent::Line(line) => {
                    if !deliver(BarEvent::Status(line)) {
                        debug!("event loop closed; stopping stdin pump");
                        return;
                    }
                }
                InputEvent::Overflow(err) => debug!(%err, "truncating status line"),
            }
        }
    }

    if !lines.pending().is_empty() {
        debug!(bytes = lines.pending().len(), "discarding unterminated status line");
    }

    info!("stdin closed");
    deliver(BarEvent::InputClosed);
}
