//! Typed argument and result tuples
//!
//! Bridges Rust closures and the dynamic [`Value`] calling convention.
//! Arguments are always a tuple (`()`, `(A,)`, `(A, B)`, ... up to six);
//! results are `()` for none, a bare type for one, or a tuple for several.

use fnspy_value::{ConversionError, FromValue, Reflect, Value, ValueType};

/// A tuple of function arguments.
pub trait ArgTuple: Sized {
    fn param_types() -> Vec<ValueType>;

    /// True when the last element is [`Variadic`](fnspy_value::Variadic).
    fn is_variadic() -> bool;

    fn into_values(self) -> Vec<Value>;

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError>;
}

/// The results of a function.
pub trait ReturnTuple: Sized {
    fn result_types() -> Vec<ValueType>;

    fn into_values(self) -> Vec<Value>;

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError>;
}

fn expect_len(values: &[Value], expected: usize) -> Result<(), ConversionError> {
    if values.len() != expected {
        return Err(ConversionError::ArityMismatch {
            expected,
            got: values.len(),
        });
    }
    Ok(())
}

fn single<T: FromValue>(values: Vec<Value>) -> Result<T, ConversionError> {
    expect_len(&values, 1)?;
    let mut values = values.into_iter();
    match values.next() {
        Some(value) => T::from_value(value),
        None => Err(ConversionError::ArityMismatch { expected: 1, got: 0 }),
    }
}

// ============================================================================
// Unit
// ============================================================================

impl ArgTuple for () {
    fn param_types() -> Vec<ValueType> {
        Vec::new()
    }

    fn is_variadic() -> bool {
        false
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
        expect_len(&values, 0)
    }
}

impl ReturnTuple for () {
    fn result_types() -> Vec<ValueType> {
        Vec::new()
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
        expect_len(&values, 0)
    }
}

// ============================================================================
// Tuples
// ============================================================================

macro_rules! tuple_impls {
    ($len:expr; $($idx:tt $name:ident),+) => {
        impl<$($name: Reflect + FromValue),+> ArgTuple for ($($name,)+) {
            fn param_types() -> Vec<ValueType> {
                vec![$(<$name as Reflect>::value_type()),+]
            }

            fn is_variadic() -> bool {
                let flags = [$(<$name as Reflect>::IS_VARIADIC),+];
                flags[flags.len() - 1]
            }

            fn into_values(self) -> Vec<Value> {
                vec![$(self.$idx.into()),+]
            }

            fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
                expect_len(&values, $len)?;
                let mut values = values.into_iter();
                Ok(($(
                    match values.next() {
                        Some(value) => <$name as FromValue>::from_value(value)
                            .map_err(|e| ConversionError::IndexError($idx, Box::new(e)))?,
                        None => return Err(ConversionError::ArityMismatch { expected: $len, got: $idx }),
                    },
                )+))
            }
        }

        impl<$($name: Reflect + FromValue),+> ReturnTuple for ($($name,)+) {
            fn result_types() -> Vec<ValueType> {
                <Self as ArgTuple>::param_types()
            }

            fn into_values(self) -> Vec<Value> {
                <Self as ArgTuple>::into_values(self)
            }

            fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
                <Self as ArgTuple>::from_values(values)
            }
        }
    };
}

tuple_impls!(1; 0 A);
tuple_impls!(2; 0 A, 1 B);
tuple_impls!(3; 0 A, 1 B, 2 C);
tuple_impls!(4; 0 A, 1 B, 2 C, 3 D);
tuple_impls!(5; 0 A, 1 B, 2 C, 3 D, 4 E);
tuple_impls!(6; 0 A, 1 B, 2 C, 3 D, 4 E, 5 F);

// ============================================================================
// Single results
// ============================================================================

macro_rules! single_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ReturnTuple for $ty {
                fn result_types() -> Vec<ValueType> {
                    vec![<$ty as Reflect>::value_type()]
                }

                fn into_values(self) -> Vec<Value> {
                    vec![self.into()]
                }

                fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
                    single(values)
                }
            }
        )*
    };
}

single_return!(bool, u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, char, String, Value);

impl<T: Reflect + FromValue> ReturnTuple for Vec<T> {
    fn result_types() -> Vec<ValueType> {
        vec![<Self as Reflect>::value_type()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
        single(values)
    }
}

impl<T: Reflect + FromValue> ReturnTuple for Option<T> {
    fn result_types() -> Vec<ValueType> {
        vec![<Self as Reflect>::value_type()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
        single(values)
    }
}

impl<T: Reflect + FromValue, E: Reflect + FromValue> ReturnTuple for Result<T, E> {
    fn result_types() -> Vec<ValueType> {
        vec![<Self as Reflect>::value_type()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![self.into()]
    }

    fn from_values(values: Vec<Value>) -> Result<Self, ConversionError> {
        single(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnspy_value::Variadic;

    #[test]
    fn tuple_types_follow_declaration_order() {
        assert_eq!(
            <(String, i32, bool) as ArgTuple>::param_types(),
            vec![ValueType::String, ValueType::S32, ValueType::Bool]
        );
        assert!(!<(String, i32) as ArgTuple>::is_variadic());
        assert!(<(String, Variadic<i32>) as ArgTuple>::is_variadic());
        // Only the trailing position counts
        assert!(!<(Variadic<i32>, String) as ArgTuple>::is_variadic());
    }

    #[test]
    fn from_values_reports_the_failing_slot() {
        let err = <(String, i32) as ArgTuple>::from_values(vec![Value::from("x"), Value::Bool(true)]);
        assert!(matches!(err, Err(ConversionError::IndexError(1, _))));

        let short = <(String, i32) as ArgTuple>::from_values(vec![Value::from("x")]);
        assert_eq!(short, Err(ConversionError::ArityMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn single_and_unit_results() {
        assert_eq!(<i64 as ReturnTuple>::result_types(), vec![ValueType::S64]);
        assert_eq!(<() as ReturnTuple>::result_types(), Vec::<ValueType>::new());
        assert_eq!(
            <Result<(), String> as ReturnTuple>::from_values(vec![Value::from(Ok::<(), String>(()))]),
            Ok(Ok(()))
        );
    }
}
