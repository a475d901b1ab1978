pub mod enumerate;
pub mod optimize;
pub mod worker;

use lineupforge::optimizer::StopSignal;
use tracing::{error, warn};

/// Raises `stop` on the first Ctrl-C. The watcher runs its own small runtime on a detached thread.
pub fn watch_for_interrupt(stop: StopSignal) {
    let spawned = std::thread::Builder::new()
        .name("interrupt-watch".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Cannot install interrupt handler: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        warn!("Interrupt received, finishing the current fold");
                        stop.raise();
                    }
                    Err(e) => error!("Signal handling failed: {}", e),
                }
            });
        });
    if let Err(e) = spawned {
        error!("Cannot start interrupt watcher: {}", e);
    }
}
