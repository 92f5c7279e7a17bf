#![no_main]

use std::sync::OnceLock;

use codec::Protocol;
use libfuzzer_sys::fuzz_target;

fn protocol() -> &'static Protocol {
    static PROTOCOL: OnceLock<Protocol> = OnceLock::new();
    PROTOCOL.get_or_init(|| {
        let mut protocol = Protocol::new();
        protocol.load_map_text("protocol.map", "FUZZ_MIX 1\nFUZZ_DEEP 2\n");
        protocol.load_def_text(
            "FUZZ_MIX.1.def",
            "int32 id\nstring name\nbytes blob\narray items\n- int16 kind\n- string label\n",
        );
        protocol.load_def_text(
            "FUZZ_DEEP.1.def",
            "object outer\n- object inner\n- - string s\narray a\n- array b\n- - byte v\n",
        );
        protocol
    })
}

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes may fail, but must never panic.
    let _ = protocol().parse_latest("FUZZ_MIX", data);
    let _ = protocol().parse_latest("FUZZ_DEEP", data);
});
