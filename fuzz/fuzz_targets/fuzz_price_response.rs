#![no_main]
use libfuzzer_sys::fuzz_target;
use parts_quote::pricing::minutes_until;
use parts_quote::{Offer, PriceResponse, ProductId};

/// Fuzz price response decoding.
///
/// Any JSON body the price endpoint might send must either decode into an
/// offer or be rejected with an error, never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(response) = serde_json::from_slice::<PriceResponse>(data) {
        if let Ok(offer) = Offer::from_response(ProductId::Number(42), response) {
            if let Some(expire_at) = offer.expire_at_ms() {
                let _ = minutes_until(expire_at, 0);
                let _ = minutes_until(expire_at, i64::MAX);
            }
        }
    }
});
