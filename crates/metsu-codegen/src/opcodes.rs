//! WebAssembly MVP opcode and section-id constants.
//!
//! Only the subset the emitter uses. Names follow the text format
//! (`local.get`, `i32.const`, ...).

// ── Section ids ───────────────────────────────────────────────────────────
pub const SECTION_TYPE: u8 = 0x01;
pub const SECTION_IMPORT: u8 = 0x02;
pub const SECTION_FUNCTION: u8 = 0x03;
pub const SECTION_EXPORT: u8 = 0x07;
pub const SECTION_CODE: u8 = 0x0a;

// ── Type bytes ────────────────────────────────────────────────────────────
pub const FUNC_TYPE: u8 = 0x60;
pub const VALTYPE_I32: u8 = 0x7f;
pub const VALTYPE_F32: u8 = 0x7d;
/// Void blocktype for `block`, `loop`, and `if`.
pub const BLOCKTYPE_EMPTY: u8 = 0x40;

// ── Import/export kinds ───────────────────────────────────────────────────
pub const KIND_FUNC: u8 = 0x00;
pub const KIND_MEMORY: u8 = 0x02;

// ── Control ───────────────────────────────────────────────────────────────
pub const BLOCK: u8 = 0x02;
pub const LOOP: u8 = 0x03;
pub const IF: u8 = 0x04;
pub const ELSE: u8 = 0x05;
pub const END: u8 = 0x0b;
pub const BR: u8 = 0x0c;
pub const BR_IF: u8 = 0x0d;
pub const RETURN: u8 = 0x0f;
pub const CALL: u8 = 0x10;

// ── Parametric / variables ────────────────────────────────────────────────
pub const DROP: u8 = 0x1a;
pub const LOCAL_GET: u8 = 0x20;
pub const LOCAL_SET: u8 = 0x21;

// ── Constants ─────────────────────────────────────────────────────────────
pub const I32_CONST: u8 = 0x41;
pub const F32_CONST: u8 = 0x43;

// ── i32 comparisons ───────────────────────────────────────────────────────
pub const I32_EQZ: u8 = 0x45;
pub const I32_EQ: u8 = 0x46;
pub const I32_NE: u8 = 0x47;
pub const I32_LT_S: u8 = 0x48;
pub const I32_GT_S: u8 = 0x4a;
pub const I32_LE_S: u8 = 0x4c;
pub const I32_GE_S: u8 = 0x4e;

// ── f32 comparisons ───────────────────────────────────────────────────────
pub const F32_EQ: u8 = 0x5b;
pub const F32_NE: u8 = 0x5c;
pub const F32_LT: u8 = 0x5d;
pub const F32_GT: u8 = 0x5e;
pub const F32_LE: u8 = 0x5f;
pub const F32_GE: u8 = 0x60;

// ── i32 arithmetic ────────────────────────────────────────────────────────
pub const I32_ADD: u8 = 0x6a;
pub const I32_SUB: u8 = 0x6b;
pub const I32_MUL: u8 = 0x6c;
pub const I32_DIV_S: u8 = 0x6d;
pub const I32_REM_S: u8 = 0x6f;
pub const I32_AND: u8 = 0x71;
pub const I32_OR: u8 = 0x72;

// ── f32 arithmetic ────────────────────────────────────────────────────────
pub const F32_ADD: u8 = 0x92;
pub const F32_SUB: u8 = 0x93;
pub const F32_MUL: u8 = 0x94;
pub const F32_DIV: u8 = 0x95;

// ── Conversions ───────────────────────────────────────────────────────────
pub const F32_CONVERT_I32_S: u8 = 0xb2;
