// Purpose - external interfaces, format conversions

pub mod converter;
#[cfg(feature = "serde")]
pub mod preset;
pub mod wav;

pub use converter::to_pcm_i16;
pub use wav::{export_kick, write_wav};
