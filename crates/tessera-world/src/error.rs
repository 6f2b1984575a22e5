use tessera_common::BlockPos;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorldError {
    #[error("block y {y} is outside the world ({min_y}..={max_y})")]
    OutOfWorld { y: i32, min_y: i32, max_y: i32 },

    #[error("block {pos:?} does not belong to this column")]
    WrongColumn { pos: BlockPos },

    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u32, bits: u8 },

    #[error("light section {section_y} is outside the light range")]
    LightSectionOutOfRange { section_y: i32 },
}
