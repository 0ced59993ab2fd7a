use fnspy::{ArgList, CallList, Func, FuncVar, Signature, Spy, SpyError, TypedVar, Value, ValueType};

const ORIGINAL_STRING: &str = "original string value";
const ORIGINAL_INT: i32 = 12345;

type Lookup = TypedVar<(String, i32, bool), (String, i32)>;

fn lookup() -> Lookup {
    TypedVar::new("lookup", |(_, _, _): (String, i32, bool)| {
        (ORIGINAL_STRING.to_string(), ORIGINAL_INT)
    })
}

fn args(s: &str, i: i32, b: bool) -> ArgList {
    vec![Value::from(s), Value::from(i), Value::from(b)]
}

#[test]
fn observe_starts_empty_and_keeps_behavior() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    assert!(!spy.called());
    assert_eq!(spy.call_count(), 0);
    assert_eq!(spy.calls(), CallList::new());

    let result = f.call(("something".to_string(), 10, false));
    assert_eq!(result, (ORIGINAL_STRING.to_string(), ORIGINAL_INT));
}

#[test]
fn single_call_is_recorded() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    f.call(("test value".to_string(), 101, true));

    assert!(spy.called());
    assert_eq!(spy.call_count(), 1);
    assert_eq!(spy.calls(), vec![args("test value", 101, true)]);
    assert_eq!(spy.args_for_call(0).unwrap(), args("test value", 101, true));
}

#[test]
fn several_calls_are_recorded_in_order() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    f.call(("call 1".to_string(), 1, true));
    f.call(("call 2".to_string(), 2, false));
    f.call(("call 3".to_string(), 3, true));

    let expected = vec![
        args("call 1", 1, true),
        args("call 2", 2, false),
        args("call 3", 3, true),
    ];
    assert_eq!(spy.call_count(), 3);
    assert_eq!(spy.calls(), expected);
    for (i, call) in expected.iter().enumerate() {
        assert_eq!(&spy.args_for_call(i).unwrap(), call);
    }
}

#[test]
fn args_for_call_out_of_range() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    assert_eq!(
        spy.args_for_call(0),
        Err(SpyError::CallIndexOutOfRange {
            target: "lookup".to_string(),
            index: 0,
            count: 0,
        })
    );

    f.call(("a".to_string(), 1, true));
    assert!(spy.args_for_call(0).is_ok());
    assert!(matches!(
        spy.args_for_call(1),
        Err(SpyError::CallIndexOutOfRange { index: 1, count: 1, .. })
    ));
}

#[test]
fn reset_clears_history_but_keeps_spying() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();
    f.call(("a".to_string(), 1, true));
    f.call(("b".to_string(), 2, true));

    spy.reset();
    assert_eq!(spy.call_count(), 0);
    assert!(!spy.called());
    assert!(spy.calls().is_empty());
    assert!(spy.is_active());

    f.call(("c".to_string(), 3, false));
    assert_eq!(spy.calls(), vec![args("c", 3, false)]);
}

#[test]
fn restore_stops_recording_and_keeps_history() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();
    f.call(("test value".to_string(), 101, true));

    spy.restore();
    assert!(!spy.is_active());
    assert_eq!(spy.call_count(), 1);
    assert_eq!(spy.calls(), vec![args("test value", 101, true)]);

    f.call(("another call".to_string(), 101, true));
    assert_eq!(spy.call_count(), 1);
    assert!(!spy.calls().contains(&args("another call", 101, true)));
}

#[test]
fn restore_puts_back_the_same_function() {
    let f = lookup();
    let original = f.var().get();

    let spy = Spy::fake(&f).unwrap();
    assert!(!f.var().get().same_as(&original));

    spy.restore();
    assert!(f.var().get().same_as(&original));
}

#[test]
fn restore_without_calls() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();
    spy.restore();

    assert_eq!(spy.call_count(), 0);
    assert_eq!(spy.calls(), CallList::new());
}

#[test]
fn end_to_end_fake_then_restore() {
    let f: TypedVar<(String, i32, bool), (String, i32)> =
        TypedVar::new("f", |(_, _, _): (String, i32, bool)| ("orig".to_string(), 7));

    let spy = Spy::fake_with_defaults(&f, vec![]).unwrap();
    assert_eq!(f.call(("x".to_string(), 1, true)), (String::new(), 0));
    assert_eq!(spy.calls(), vec![args("x", 1, true)]);

    spy.restore();
    assert_eq!(f.call(("y".to_string(), 2, false)), ("orig".to_string(), 7));
    assert_eq!(spy.calls(), vec![args("x", 1, true)]);
}

#[test]
fn unset_target_is_invalid() {
    let f: TypedVar<(i32,), i32> = TypedVar::unset("missing");
    assert!(matches!(Spy::observe(&f), Err(SpyError::InvalidTarget { .. })));
    assert!(matches!(Spy::fake(&f), Err(SpyError::InvalidTarget { .. })));
    assert!(matches!(
        Spy::fake_with_returns(&f, vec![Value::S32(1)]),
        Err(SpyError::InvalidTarget { .. })
    ));
    assert!(matches!(
        Spy::fake_with_delegate(&f, Func::typed(|(x,): (i32,)| x)),
        Err(SpyError::InvalidTarget { .. })
    ));
}

#[test]
fn second_spy_on_same_target_is_rejected_until_restore() {
    let f = lookup();
    let first = Spy::observe(&f).unwrap();

    let err = Spy::fake(&f).unwrap_err();
    assert!(matches!(err, SpyError::InvalidTarget { .. }));
    assert!(err.to_string().contains("lookup"));

    first.restore();
    let second = Spy::fake(&f).unwrap();
    f.call(("z".to_string(), 0, false));
    assert_eq!(second.call_count(), 1);
    assert_eq!(first.call_count(), 0);
}

#[test]
fn repeated_restore_is_harmless() {
    let f = lookup();
    let spy = Spy::fake(&f).unwrap();
    spy.restore();
    spy.restore();

    assert_eq!(
        f.call(("a".to_string(), 1, true)),
        (ORIGINAL_STRING.to_string(), ORIGINAL_INT)
    );
}

#[test]
fn zero_argument_calls_are_distinguishable_from_no_calls() {
    let tick = FuncVar::new(
        "tick",
        Func::new(Signature::new(vec![], vec![]), |_| Ok(Vec::new())),
    );
    let spy = Spy::observe(&tick).unwrap();
    assert!(spy.calls().is_empty());

    tick.call(vec![]).unwrap();
    assert_eq!(spy.calls(), vec![ArgList::new()]);
}

#[test]
fn ill_typed_calls_never_reach_the_spy() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    let result = f.var().call(vec![Value::from("x"), Value::S64(1), Value::Bool(true)]);
    assert!(result.is_err());
    assert_eq!(spy.call_count(), 0);
}

#[test]
fn dynamic_and_typed_calls_share_the_history() {
    let f = lookup();
    let spy = Spy::observe(&f).unwrap();

    f.call(("typed".to_string(), 1, true));
    let out = f.var().call(args("dynamic", 2, false)).unwrap();

    assert_eq!(out, vec![Value::from(ORIGINAL_STRING), Value::from(ORIGINAL_INT)]);
    assert_eq!(spy.calls(), vec![args("typed", 1, true), args("dynamic", 2, false)]);
    assert_eq!(spy.signature().results(), &[ValueType::String, ValueType::S32]);
}
