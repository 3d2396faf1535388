// User domain module
// The acting user is identified only by an opaque id

pub mod value_objects;

pub use value_objects::UserId;
