//! Construction macros for parameter lists and configuration maps.

/// Builds a [`Params`](crate::Params) list.
///
/// Dense form wraps each expression into a [`Value`](crate::Value) at
/// consecutive positions; the arrow form sets explicit positions.
///
/// # Examples
///
/// ```rust
/// use bindery::params;
///
/// let dense = params!["localhost".to_string(), 5432u16];
/// assert_eq!(dense.len(), 2);
///
/// let sparse = params! { 1 => 6543u16 };
/// assert!(sparse.get(0).is_none());
/// assert!(sparse.get(1).is_some());
/// ```
#[macro_export]
macro_rules! params {
    () => { $crate::Params::new() };
    ($($index:expr => $val:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(params.insert($index, $crate::value($val));)+
        params
    }};
    ($($val:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(params.push($crate::value($val));)+
        params
    }};
}

/// Builds a [`Config`](crate::Config) map, wrapping each value into a
/// [`Value`](crate::Value).
///
/// # Examples
///
/// ```rust
/// use bindery::{config, downcast};
///
/// let config = config! {
///     "host" => "localhost".to_string(),
///     "port" => 5432u16,
/// };
/// assert_eq!(*downcast::<u16>(&config["port"]).unwrap(), 5432);
/// ```
#[macro_export]
macro_rules! config {
    () => { $crate::Config::new() };
    ($($key:expr => $val:expr),+ $(,)?) => {{
        let mut config = $crate::Config::new();
        $(config.insert($key.to_string(), $crate::value($val));)+
        config
    }};
}
