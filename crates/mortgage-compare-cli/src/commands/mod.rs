pub mod mortgage;
pub mod sensitivity;
