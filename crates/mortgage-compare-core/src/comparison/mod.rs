pub mod differences;

#[cfg(feature = "form")]
pub mod form;
