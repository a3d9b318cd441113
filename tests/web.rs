// Browser-only checks; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use serifu_practice::storage::LocalStorage;
use serifu_practice::{ProgressStore, progress_key};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut store = LocalStorage::open().unwrap();
    let key = progress_key("serifuTest", "show-1", 2);
    store.write(&key, "1").unwrap();
    assert_eq!(store.read(&key).unwrap().as_deref(), Some("1"));
}
