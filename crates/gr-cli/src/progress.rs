//! Terminal spinner fed by fetch progress updates.

use std::io::Write as _;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use gr_github::{Progress, ProgressSender};

const FRAMES: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];
const TICK: Duration = Duration::from_millis(120);

/// An animated spinner on stderr showing the latest fetch progress.
///
/// Purely advisory: it polls the latest update and never applies
/// backpressure to the pipeline publishing them.
pub struct Spinner {
    progress: ProgressSender,
    handle: JoinHandle<()>,
}

impl Spinner {
    /// Starts the spinner task.
    #[must_use]
    pub fn start() -> Self {
        let (progress, updates) = ProgressSender::channel();
        let handle = tokio::spawn(render_loop(updates));
        Self { progress, handle }
    }

    /// A handle the fetch pipeline publishes updates through.
    #[must_use]
    pub fn progress(&self) -> ProgressSender {
        self.progress.clone()
    }

    /// Stops the spinner and prints a final line in its place.
    pub async fn finish(self, message: &str) {
        // Dropping the last sender ends the render loop.
        drop(self.progress);
        let _ = self.handle.await;
        eprintln!("\r{message}");
    }
}

async fn render_loop(mut updates: watch::Receiver<Progress>) {
    let mut interval = tokio::time::interval(TICK);
    let mut frame = 0usize;
    let mut width = 0usize;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = updates.changed() => {
                if changed.is_err() {
                    // All senders gone; clear the line and stop.
                    eprint!("\r{:width$}\r", "");
                    let _ = std::io::stderr().flush();
                    return;
                }
            }
        }

        let message = render(&updates.borrow());
        if message.is_empty() {
            continue;
        }

        let line = format!("{} {message}", FRAMES[frame]);
        width = width.max(line.chars().count());
        eprint!("\r{line:<width$}");
        let _ = std::io::stderr().flush();
        frame = (frame + 1) % FRAMES.len();
    }
}

fn render(progress: &Progress) -> String {
    match progress {
        Progress::Idle => String::new(),
        Progress::FetchingPosts { fetched } => format!("fetched {fetched} posts"),
        Progress::FetchingReactions {
            current,
            total,
            found,
        } => {
            format!("checking reactions on posts {current}/{total}: {found} reactions found")
        }
    }
}
