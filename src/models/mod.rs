pub mod freepik;
pub mod openai;
pub mod request;

pub use freepik::*;
pub use openai::*;
pub use request::*;
