//! Android `KeyEvent` codes used by the UI primitives

pub const MENU: u32 = 82;
pub const BACK: u32 = 4;
pub const DPAD_UP: u32 = 19;
pub const DPAD_DOWN: u32 = 20;
pub const DPAD_LEFT: u32 = 21;
pub const DPAD_RIGHT: u32 = 22;
pub const DPAD_CENTER: u32 = 23;
pub const SPACE: u32 = 62;
pub const DEL: u32 = 67;
pub const PAGE_DOWN: u32 = 93;
pub const MOVE_HOME: u32 = 122;
pub const MOVE_END: u32 = 123;
