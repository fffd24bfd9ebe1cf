pub mod constants;
pub mod formatting;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
