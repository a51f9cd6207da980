#![no_main]

//! Snapshot import fuzzer: arbitrary bytes must never panic the decoder or
//! the importer, and anything accepted must satisfy the invariants.

use libfuzzer_sys::fuzz_target;
use shadowops::GameManager;
use shadowops::game::check_invariants;
use shadowops::persistence::decode_state;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(state) = decode_state(text) else {
        return;
    };

    if let Ok(manager) = GameManager::from_state(state) {
        assert!(check_invariants(manager.state()).is_empty());

        // Accepted snapshots round-trip
        let json = serde_json::to_string(manager.state()).unwrap();
        let again = decode_state(&json).unwrap();
        assert_eq!(&again, manager.state());
    }
});
