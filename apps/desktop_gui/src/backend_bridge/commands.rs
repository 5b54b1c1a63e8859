//! Backend commands queued from UI to backend worker.

use client_core::Effect;

pub enum BackendCommand {
    Run(Effect),
}
