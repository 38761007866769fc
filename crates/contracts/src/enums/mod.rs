pub mod platform_type;

pub use platform_type::PlatformType;
