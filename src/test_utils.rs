/*
 * Test utilities for msi-ec
 *
 * Builders for an attribute table and a register bank shaped like a
 * 14C1EMS1 EC, shared by the unit tests of several modules.
 */

use crate::attribute::{Access, Attribute, AttributeTable, Location, Span};
use crate::codec::{Codec, Scale, State, Threshold};
use crate::transport::MemoryTransport;

fn register(name: &str, access: Access, address: u8, codec: Codec) -> Attribute {
    Attribute::new(name, access, Location::Register(address), codec)
}

fn states(pairs: &[(&str, u8)]) -> Codec {
    Codec::Enumeration {
        states: pairs.iter().map(|&(name, code)| State::new(name, code)).collect(),
    }
}

/// Attribute definitions for the tests
///
/// The basic fan speed uses a 0x00-0x96 base range so that 0x4b reads as 50%.
pub fn sample_attributes() -> Vec<Attribute> {
    use Access::{ReadOnly, ReadWrite};

    vec![
        register("webcam", ReadWrite, 0x2e, Codec::Toggle { on: 0x4a, off: 0x48 }),
        register("fn_key", ReadWrite, 0xbf, states(&[("left", 0x40), ("right", 0x50)])),
        register("win_key", ReadWrite, 0xbf, states(&[("left", 0x50), ("right", 0x40)])),
        register("battery_mode", ReadWrite, 0xef, states(&[("max", 0xe4), ("medium", 0xd0), ("min", 0xbc)])),
        register(
            "charge_control_start_threshold",
            ReadWrite,
            0xef,
            Codec::Threshold(Threshold::new(0x8a, 0x8a, 0xe4)),
        ),
        register(
            "charge_control_end_threshold",
            ReadWrite,
            0xef,
            Codec::Threshold(Threshold::new(0x80, 0x8a, 0xe4)),
        ),
        register("cooler_boost", ReadWrite, 0x98, Codec::Toggle { on: 0x82, off: 0x02 }),
        register(
            "shift_mode",
            ReadWrite,
            0xf2,
            states(&[("performance", 0xc4), ("balanced", 0xc1), ("eco", 0xc2), ("off", 0x80)]),
        ),
        register("fan_mode", ReadWrite, 0xf4, states(&[("silent", 0x1d), ("basic", 0x4d), ("advanced", 0x8d)])),
        Attribute::new("fw_version", ReadOnly, Location::Sequence(Span::new(0xa0, 12)), Codec::Version),
        Attribute::new(
            "fw_release_date",
            ReadOnly,
            Location::Pair(Span::new(0xac, 8), Span::new(0xb4, 8)),
            Codec::Release,
        ),
        register("cpu/realtime_temperature", ReadOnly, 0x68, Codec::Raw),
        register("cpu/realtime_fan_speed", ReadOnly, 0x71, Codec::Scaled(Scale::new(0x19, 0x37))),
        register("cpu/basic_fan_speed", ReadWrite, 0x89, Codec::Scaled(Scale::new(0x00, 0x96))),
        register("gpu/realtime_temperature", ReadOnly, 0x80, Codec::Raw),
        register("gpu/realtime_fan_speed", ReadOnly, 0x89, Codec::Raw),
        register("mute_led", ReadWrite, 0x2c, Codec::Toggle { on: 0x82, off: 0x80 }),
        register("micmute_led", ReadWrite, 0x2b, Codec::Toggle { on: 0x82, off: 0x80 }),
        register("kbd_backlight", ReadWrite, 0xf3, Codec::Backlight { mask: 0x03, levels: [0x80, 0x81, 0x82, 0x83] }),
    ]
}

pub fn sample_table() -> AttributeTable {
    AttributeTable::new(sample_attributes()).unwrap()
}

/// Register bank where every sample attribute decodes to a documented value
pub fn sample_transport() -> MemoryTransport {
    let transport = MemoryTransport::with_registers(&[
        (0x2e, 0x4a),
        (0xbf, 0x40),
        (0xef, 0xe4),
        (0x98, 0x02),
        (0xf2, 0xc1),
        (0xf4, 0x4d),
        (0x68, 55),
        (0x71, 0x28),
        (0x89, 0x4b),
        (0x80, 48),
        (0x2c, 0x80),
        (0x2b, 0x80),
        (0xf3, 0x81),
    ]);
    transport.load(0xa0, b"14C1EMS1.012");
    transport.load(0xac, b"07042024");
    transport.load(0xb4, b"13:05:59");
    transport
}
