use strum::IntoEnumIterator;

/// String forms of every variant of `T`, comma separated; used to list the
/// accepted values in parse errors.
pub fn valid_csv<T>() -> String
where
    T: IntoEnumIterator + AsRef<str>,
{
    let names: Vec<String> = T::iter().map(|v| v.as_ref().to_owned()).collect();
    names.join(", ")
}
