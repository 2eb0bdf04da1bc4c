pub mod repository_traits;
pub mod platform_traits;
