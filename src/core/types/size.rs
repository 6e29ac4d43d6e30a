use std::fmt;

/// A concrete numeric width/signedness tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberSize {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Dec32,
    Dec64,
}

impl NumberSize {
    pub const ALL: [NumberSize; 10] = [
        NumberSize::Int8,
        NumberSize::Int16,
        NumberSize::Int32,
        NumberSize::Int64,
        NumberSize::Uint8,
        NumberSize::Uint16,
        NumberSize::Uint32,
        NumberSize::Uint64,
        NumberSize::Dec32,
        NumberSize::Dec64,
    ];

    pub const INTEGERS: [NumberSize; 8] = [
        NumberSize::Int8,
        NumberSize::Int16,
        NumberSize::Int32,
        NumberSize::Int64,
        NumberSize::Uint8,
        NumberSize::Uint16,
        NumberSize::Uint32,
        NumberSize::Uint64,
    ];

    pub const DECIMALS: [NumberSize; 2] = [NumberSize::Dec32, NumberSize::Dec64];

    pub fn bit_width(self) -> u32 {
        match self {
            NumberSize::Int8 | NumberSize::Uint8 => 8,
            NumberSize::Int16 | NumberSize::Uint16 => 16,
            NumberSize::Int32 | NumberSize::Uint32 | NumberSize::Dec32 => 32,
            NumberSize::Int64 | NumberSize::Uint64 | NumberSize::Dec64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        !matches!(
            self,
            NumberSize::Uint8 | NumberSize::Uint16 | NumberSize::Uint32 | NumberSize::Uint64
        )
    }

    pub fn is_decimal(self) -> bool {
        matches!(self, NumberSize::Dec32 | NumberSize::Dec64)
    }

    /// Whether an integer value fits this size without loss.
    pub fn holds_integer(self, value: i128) -> bool {
        match self {
            NumberSize::Int8 => i128::from(i8::MIN) <= value && value <= i128::from(i8::MAX),
            NumberSize::Int16 => i128::from(i16::MIN) <= value && value <= i128::from(i16::MAX),
            NumberSize::Int32 => i128::from(i32::MIN) <= value && value <= i128::from(i32::MAX),
            NumberSize::Int64 => i128::from(i64::MIN) <= value && value <= i128::from(i64::MAX),
            NumberSize::Uint8 => 0 <= value && value <= i128::from(u8::MAX),
            NumberSize::Uint16 => 0 <= value && value <= i128::from(u16::MAX),
            NumberSize::Uint32 => 0 <= value && value <= i128::from(u32::MAX),
            NumberSize::Uint64 => 0 <= value && value <= i128::from(u64::MAX),
            // integers are representable in either decimal width up to 2^53,
            // but an integer literal is not a decimal literal
            NumberSize::Dec32 | NumberSize::Dec64 => false,
        }
    }

    /// All sizes able to hold an integer literal of the given value. A
    /// negative value excludes every unsigned width by range alone.
    pub fn sizes_for_integer(value: i128) -> Vec<NumberSize> {
        NumberSize::INTEGERS
            .iter()
            .copied()
            .filter(|size| size.holds_integer(value))
            .collect()
    }

    /// All sizes able to hold a decimal literal of the given value. A
    /// decimal point restricts the candidates to the decimal widths; dec32
    /// drops out once the magnitude exceeds what an f32 can represent.
    pub fn sizes_for_decimal(value: f64) -> Vec<NumberSize> {
        if value.abs() <= f64::from(f32::MAX) {
            NumberSize::DECIMALS.to_vec()
        } else {
            vec![NumberSize::Dec64]
        }
    }

    pub fn from_name(name: &str) -> Option<NumberSize> {
        let size = match name {
            "int8" => NumberSize::Int8,
            "int16" => NumberSize::Int16,
            "int32" => NumberSize::Int32,
            "int64" => NumberSize::Int64,
            "uint8" => NumberSize::Uint8,
            "uint16" => NumberSize::Uint16,
            "uint32" => NumberSize::Uint32,
            "uint64" => NumberSize::Uint64,
            "dec32" => NumberSize::Dec32,
            "dec64" => NumberSize::Dec64,
            _ => return None,
        };
        Some(size)
    }
}

impl fmt::Display for NumberSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumberSize::Int8 => "int8",
            NumberSize::Int16 => "int16",
            NumberSize::Int32 => "int32",
            NumberSize::Int64 => "int64",
            NumberSize::Uint8 => "uint8",
            NumberSize::Uint16 => "uint16",
            NumberSize::Uint32 => "uint32",
            NumberSize::Uint64 => "uint64",
            NumberSize::Dec32 => "dec32",
            NumberSize::Dec64 => "dec64",
        };
        write!(f, "{name}")
    }
}
