/// Intercept messages using the `log` crate and print them to STDERR. Defaults to `info`, and
/// `RUST_LOG` overrides that as usual.
pub fn setup() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
