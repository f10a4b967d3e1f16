//! Shared helpers for integration tests.

use std::sync::Arc;

use folio_token::{Clock, ManualClock, TokenCodec};

/// 2023-11-14T22:13:20Z
#[allow(dead_code)]
pub const T0: u64 = 1_700_000_000;

/// A codec on a manual clock frozen at [`T0`].
#[allow(dead_code)]
pub fn codec_at_t0(secret: &str) -> (TokenCodec, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let codec = TokenCodec::new(secret)
        .unwrap()
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>);
    (codec, clock)
}
