mod names;
mod parse;
mod profile;

pub use names::{parse_axis_name, parse_button_name, parse_input, parse_key_name};
pub(crate) use profile::InputMapV1;
