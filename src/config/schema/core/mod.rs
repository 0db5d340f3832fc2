mod env_overrides;
mod loader;
mod types;
mod validate;

#[cfg(test)]
mod test_env;

pub use types::Config;
