use vip8_macros::Decode;

/// The CHIP-8 instruction set. The `opcode` attribute on each variant is
/// its entry in the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode)]
pub enum Instruction {
    #[opcode("00E0")]
    ClearScreen,
    #[opcode("00EE")]
    Return,
    #[opcode("1nnn")]
    Jump { nnn: u16 },
    #[opcode("2nnn")]
    Call { nnn: u16 },
    #[opcode("3xnn")]
    SkipIfEqual { x: u8, nn: u8 },
    #[opcode("4xnn")]
    SkipIfNotEqual { x: u8, nn: u8 },
    #[opcode("5xy0")]
    SkipIfRegistersEqual { x: u8, y: u8 },
    #[opcode("6xnn")]
    Load { x: u8, nn: u8 },
    #[opcode("7xnn")]
    AddImmediate { x: u8, nn: u8 },
    #[opcode("8xy0")]
    Copy { x: u8, y: u8 },
    #[opcode("8xy1")]
    Or { x: u8, y: u8 },
    #[opcode("8xy2")]
    And { x: u8, y: u8 },
    #[opcode("8xy3")]
    Xor { x: u8, y: u8 },
    #[opcode("8xy4")]
    Add { x: u8, y: u8 },
    #[opcode("8xy5")]
    Sub { x: u8, y: u8 },
    #[opcode("8xy6")]
    ShiftRight { x: u8 },
    #[opcode("8xy7")]
    SubReverse { x: u8, y: u8 },
    #[opcode("8xyE")]
    ShiftLeft { x: u8 },
    #[opcode("9xy0")]
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    #[opcode("Annn")]
    SetIndex { nnn: u16 },
    #[opcode("Bnnn")]
    JumpOffset { nnn: u16 },
    #[opcode("Cxnn")]
    Random { x: u8, nn: u8 },
    #[opcode("Dxyn")]
    Draw { x: u8, y: u8, n: u8 },
    #[opcode("Ex9E")]
    SkipIfKey { x: u8 },
    #[opcode("ExA1")]
    SkipIfNotKey { x: u8 },
    #[opcode("Fx07")]
    ReadDelayTimer { x: u8 },
    #[opcode("Fx0A")]
    WaitForKey { x: u8 },
    #[opcode("Fx15")]
    SetDelayTimer { x: u8 },
    #[opcode("Fx18")]
    SetSoundTimer { x: u8 },
    #[opcode("Fx1E")]
    AddToIndex { x: u8 },
    #[opcode("Fx29")]
    FontGlyph { x: u8 },
    #[opcode("Fx33")]
    StoreBcd { x: u8 },
    #[opcode("Fx55")]
    StoreRegisters { x: u8 },
    #[opcode("Fx65")]
    LoadRegisters { x: u8 },
}
