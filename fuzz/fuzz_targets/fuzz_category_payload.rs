#![no_main]
use libfuzzer_sys::fuzz_target;
use parts_quote::catalog::{children_at, level_options};
use parts_quote::model::CategoryPayload;
use parts_quote::CategoryPath;

/// Fuzz category tree parsing and navigation.
///
/// Whatever tree arrives, walking it along its own first branch must stay
/// total.
fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = serde_json::from_slice::<CategoryPayload>(data) {
        let root = payload.into_root();
        let mut path = CategoryPath::root();
        let mut node = &root;
        while let Some(first) = node.children.first() {
            path = path.child(first.name.clone());
            node = first;
        }
        let _ = children_at(&root, &path);
        let _ = level_options(&root, &path);
    }
});
