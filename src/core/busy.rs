//! Busy indicator for the control that triggered a request.
//!
//! The guard disables the control and swaps in the busy label when engaged,
//! and puts the original label back and re-enables the control when dropped.
//! Every exit from a handler therefore clears it, early returns and
//! unwinding included.

use std::sync::{Arc, Mutex};

use log::debug;

use crate::core::navigator::{Shared, lock_shared};
use crate::host::NodeId;

pub(crate) struct BusyGuard {
    shared: Arc<Mutex<Shared>>,
    node: NodeId,
    original_label: String,
}

impl BusyGuard {
    /// Marks `node` busy through `state`, the caller's guard on `shared`,
    /// so the caller's disabled check and the marking happen under one lock.
    /// The returned guard must outlive that lock: dropping it locks `shared`.
    pub(crate) fn engage(
        shared: &Arc<Mutex<Shared>>,
        state: &mut Shared,
        node: NodeId,
        busy_label: &str,
    ) -> Self {
        let original_label = state.document.inner_html(node).unwrap_or_default();
        state.document.set_inner_html(node, busy_label);
        state.document.set_disabled(node, true);
        debug!("Control {} busy", node);
        Self {
            shared: Arc::clone(shared),
            node,
            original_label,
        }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut state = lock_shared(&self.shared);
        state.document.set_inner_html(self.node, &self.original_label);
        state.document.set_disabled(self.node, false);
        debug!("Control {} restored", self.node);
    }
}
