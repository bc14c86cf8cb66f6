pub mod address;
pub mod ask;
pub mod clock;
pub mod fee;
pub mod key;
pub mod signature;

pub use address::*;
pub use ask::*;
pub use clock::*;
pub use fee::*;
pub use key::*;
pub use signature::*;
