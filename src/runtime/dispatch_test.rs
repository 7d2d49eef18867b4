use std::sync::{Arc, Mutex};

use crate::runtime::{
    argument_definition::ArgumentDefinition,
    arguments::CallArguments,
    call_target::{BuiltinCallTarget, CallTarget, arg_int},
    caller_info::CallerInfo,
    config::RuntimeConfig,
    dispatch::{CurryDispatcher, Dispatcher},
    error::RuntimeError,
    function::Function,
    function_schema::{CallStrategy, FunctionSchema},
    scope::Scope,
    thunk::Thunk,
    value::Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dispatcher() -> CurryDispatcher {
    init_tracing();
    CurryDispatcher::new(RuntimeConfig {
        trace_calls: true,
        call_loop_limit: None,
    })
}

fn two_args() -> Vec<ArgumentDefinition> {
    vec![ArgumentDefinition::new(0, "x"), ArgumentDefinition::new(1, "y")]
}

#[derive(Default)]
struct RecordingAdd {
    seen: Mutex<Vec<Vec<Value>>>,
}

impl CallTarget for RecordingAdd {
    fn name(&self) -> &str {
        "add"
    }

    fn invoke(&self, arguments: CallArguments) -> Result<Value, RuntimeError> {
        self.seen
            .lock()
            .unwrap()
            .push(arguments.positional_arguments().to_vec());
        Ok(Value::Integer(arg_int(&arguments, 0)? + arg_int(&arguments, 1)?))
    }
}

#[test]
fn add_curried_one_argument_at_a_time() {
    let dispatcher = dispatcher();
    let target = Arc::new(RecordingAdd::default());
    let schema = Arc::new(FunctionSchema::new(CallStrategy::Direct, two_args()));
    let add2 = Function::new(target.clone(), None, Arc::clone(&schema));

    let add2_5 = dispatcher
        .apply(&add2, None, Value::Unit, vec![Value::Integer(5)])
        .unwrap();
    let add2_5 = add2_5.as_function().expect("partial application");
    assert_eq!(add2_5.clone_pre_applied_arguments(), vec![Value::Integer(5)]);
    assert!(Arc::ptr_eq(add2_5.schema(), &schema));
    assert!(Arc::ptr_eq(add2_5.call_target(), add2.call_target()));
    assert!(target.seen.lock().unwrap().is_empty());

    let result = dispatcher
        .apply(add2_5, None, Value::Unit, vec![Value::Integer(3)])
        .unwrap();
    assert_eq!(result, Value::Integer(8));
    assert_eq!(
        *target.seen.lock().unwrap(),
        vec![vec![Value::Integer(5), Value::Integer(3)]]
    );
    assert!(add2.clone_pre_applied_arguments().is_empty());
}

fn add_with_default_y(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let y = match arguments.positional_arguments().get(1) {
        Some(_) => arg_int(&arguments, 1)?,
        None => 10,
    };
    Ok(Value::Integer(arg_int(&arguments, 0)? + y))
}

#[test]
fn defaults_saturate_short_applications() {
    let f = Function::from_builtin(
        "add_default",
        add_with_default_y,
        CallStrategy::Direct,
        vec![
            ArgumentDefinition::new(0, "x"),
            ArgumentDefinition::with_default(1, "y"),
        ],
    );
    let dispatcher = dispatcher();

    let result = dispatcher.apply(&f, None, Value::Unit, vec![Value::Integer(1)]);
    assert_eq!(result.unwrap(), Value::Integer(11));

    let result = dispatcher.apply(&f, None, Value::Unit, vec![Value::Integer(1), Value::Integer(2)]);
    assert_eq!(result.unwrap(), Value::Integer(3));

    let result = dispatcher.apply(&f, None, Value::Unit, vec![]).unwrap();
    assert!(result.as_function().is_some());
}

fn adder(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let x = arguments
        .local_scope()
        .and_then(|scope| scope.lookup("x"))
        .and_then(Value::as_integer)
        .ok_or_else(|| RuntimeError::failure("x is unbound"))?;
    Ok(Value::Integer(x + arg_int(&arguments, 0)?))
}

fn make_adder(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let x = Value::Integer(arg_int(&arguments, 0)?);
    let scope = Scope::root().extend(vec![("x".into(), x)]);
    Ok(Value::from(Function::new(
        Arc::new(BuiltinCallTarget::new("adder", adder)),
        Some(scope),
        Arc::new(FunctionSchema::new(
            CallStrategy::Direct,
            vec![ArgumentDefinition::new(0, "y")],
        )),
    )))
}

fn make_adder_schema() -> Arc<FunctionSchema> {
    Arc::new(FunctionSchema::new(
        CallStrategy::Direct,
        vec![ArgumentDefinition::new(0, "x")],
    ))
}

#[test]
fn oversaturated_arguments_apply_to_result() {
    let f = Function::new(
        Arc::new(BuiltinCallTarget::new("make_adder", make_adder)),
        None,
        make_adder_schema(),
    );
    let result = dispatcher()
        .apply(&f, None, Value::Unit, vec![Value::Integer(1), Value::Integer(2)])
        .unwrap();
    assert_eq!(result, Value::Integer(3));
}

#[test]
fn oversaturating_a_non_function_result_fails() {
    let f = Function::from_builtin("add", |a| {
        Ok(Value::Integer(arg_int(&a, 0)? + arg_int(&a, 1)?))
    }, CallStrategy::Direct, two_args());
    let err = dispatcher()
        .apply(
            &f,
            None,
            Value::Unit,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)],
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotAFunction("Int")));
}

#[test]
fn carried_oversaturated_arguments_apply_once_saturated() {
    let f = Function::with_arguments(
        Arc::new(BuiltinCallTarget::new("make_adder", make_adder)),
        None,
        make_adder_schema(),
        None,
        Some(vec![Value::Integer(10)]),
    );
    let result = dispatcher()
        .apply(&f, None, Value::Unit, vec![Value::Integer(5)])
        .unwrap();
    assert_eq!(result, Value::Integer(15));
    // The function itself still carries them for any later call.
    assert_eq!(f.oversaturated_arguments(), &[Value::Integer(10)]);
}

fn sum_to_function() -> Function {
    Function::from_builtin(
        "sum_to",
        sum_to,
        CallStrategy::CallLoop,
        vec![ArgumentDefinition::new(0, "n"), ArgumentDefinition::new(1, "acc")],
    )
}

fn sum_to(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let n = arg_int(&arguments, 0)?;
    let acc = arg_int(&arguments, 1)?;
    if n == 0 {
        return Ok(Value::Integer(acc));
    }
    Err(RuntimeError::tail_call(
        Arc::new(sum_to_function()),
        vec![Value::Integer(n - 1), Value::Integer(acc + n)],
    ))
}

#[test]
fn call_loop_resolves_deep_tail_recursion() {
    let result = dispatcher()
        .apply(
            &sum_to_function(),
            None,
            Value::Unit,
            vec![Value::Integer(100_000), Value::Integer(0)],
        )
        .unwrap();
    assert_eq!(result, Value::Integer(5_000_050_000));
}

#[test]
fn call_loop_respects_configured_limit() {
    let dispatcher = CurryDispatcher::new(RuntimeConfig {
        trace_calls: false,
        call_loop_limit: Some(10),
    });
    let err = dispatcher
        .apply(
            &sum_to_function(),
            None,
            Value::Unit,
            vec![Value::Integer(100), Value::Integer(0)],
        )
        .unwrap_err();
    assert!(matches!(err, RuntimeError::CallLoopLimit(10)));

    let ok = dispatcher.apply(
        &sum_to_function(),
        None,
        Value::Unit,
        vec![Value::Integer(10), Value::Integer(0)],
    );
    assert_eq!(ok.unwrap(), Value::Integer(55));
}

fn bounce_function() -> Function {
    Function::from_builtin(
        "bounce",
        |_| {
            Err(RuntimeError::tail_call(
                Arc::new(sum_to_function()),
                vec![Value::Integer(3), Value::Integer(0)],
            ))
        },
        CallStrategy::Direct,
        vec![],
    )
}

#[test]
fn top_level_apply_resolves_direct_tail_calls() {
    let result = dispatcher()
        .apply(&bounce_function(), None, Value::Unit, vec![])
        .unwrap();
    assert_eq!(result, Value::Integer(6));
}

/// Calls `inner` from inside its own body, the way compiled code makes a
/// call in tail position, and records whether a tail call came back.
struct TailPosition {
    dispatcher: CurryDispatcher,
    inner: Function,
    saw_tail_call: Mutex<bool>,
}

impl CallTarget for TailPosition {
    fn name(&self) -> &str {
        "tail_position"
    }

    fn invoke(&self, arguments: CallArguments) -> Result<Value, RuntimeError> {
        let result =
            self.dispatcher
                .apply_in_frame(&self.inner, None, arguments.state().clone(), vec![]);
        if let Err(err) = &result {
            *self.saw_tail_call.lock().unwrap() = err.is_tail_call();
        }
        result
    }
}

#[test]
fn direct_tail_calls_reach_the_enclosing_call_loop() {
    let dispatcher = dispatcher();
    let nested = dispatcher
        .apply_in_frame(&bounce_function(), None, Value::Unit, vec![])
        .unwrap_err();
    assert!(nested.is_tail_call());

    let target = Arc::new(TailPosition {
        dispatcher: dispatcher.clone(),
        inner: bounce_function(),
        saw_tail_call: Mutex::new(false),
    });
    let outer = Function::new(
        target.clone(),
        None,
        Arc::new(FunctionSchema::new(CallStrategy::CallLoop, vec![])),
    );
    let result = dispatcher
        .apply_in_frame(&outer, None, Value::Unit, vec![])
        .unwrap();
    assert_eq!(result, Value::Integer(6));
    assert!(*target.saw_tail_call.lock().unwrap());
}

fn state_body(arguments: CallArguments) -> Result<Value, RuntimeError> {
    Ok(arguments.state().clone())
}

fn describe_arguments(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let names: Vec<Value> = arguments
        .positional_arguments()
        .iter()
        .map(|value| match value {
            Value::Thunk(_) => Value::from("Thunk"),
            other => other.clone(),
        })
        .collect();
    Ok(Value::Array(Arc::new(names)))
}

#[test]
fn eager_arguments_are_forced_and_suspended_ones_are_not() {
    let f = Function::from_builtin(
        "describe",
        describe_arguments,
        CallStrategy::Direct,
        vec![
            ArgumentDefinition::new(0, "eager"),
            ArgumentDefinition::suspended(1, "lazy"),
        ],
    );
    let lazy_state = || {
        Value::Thunk(Arc::new(Thunk::new(
            Arc::new(BuiltinCallTarget::new("state", state_body)),
            Scope::root(),
        )))
    };

    let result = dispatcher()
        .apply(&f, None, Value::Integer(99), vec![lazy_state(), lazy_state()])
        .unwrap();
    assert_eq!(
        result,
        Value::Array(Arc::new(vec![Value::Integer(99), Value::from("Thunk")]))
    );
}

#[test]
fn thunks_are_forced_until_a_value_appears() {
    let f = Function::from_builtin(
        "describe",
        describe_arguments,
        CallStrategy::Direct,
        vec![ArgumentDefinition::new(0, "eager")],
    );
    fn nested(_: CallArguments) -> Result<Value, RuntimeError> {
        Ok(Value::Thunk(Arc::new(Thunk::new(
            Arc::new(BuiltinCallTarget::new("inner", |_| Ok(Value::Integer(4)))),
            Scope::root(),
        ))))
    }
    let outer = Value::Thunk(Arc::new(Thunk::new(
        Arc::new(BuiltinCallTarget::new("outer", nested)),
        Scope::root(),
    )));

    let result = dispatcher().apply(&f, None, Value::Unit, vec![outer]).unwrap();
    assert_eq!(result, Value::Array(Arc::new(vec![Value::Integer(4)])));
}

fn caller_name(arguments: CallArguments) -> Result<Value, RuntimeError> {
    let info = arguments
        .caller_info()
        .ok_or_else(|| RuntimeError::failure("caller info missing"))?;
    Ok(Value::from(info.caller_name().unwrap_or("<detached>")))
}

#[test]
fn full_caller_frame_access_always_sees_caller_info() {
    let f = Function::from_builtin_with_caller_frame_access(
        "caller_name",
        caller_name,
        CallStrategy::Direct,
        vec![],
    );
    let dispatcher = dispatcher();

    let detached = dispatcher.apply(&f, None, Value::Unit, vec![]).unwrap();
    assert_eq!(detached, Value::from("<detached>"));

    let info = Arc::new(CallerInfo::new(Some(Scope::root()), Some("main".into()), None));
    let named = dispatcher.apply(&f, Some(info), Value::Unit, vec![]).unwrap();
    assert_eq!(named, Value::from("main"));
}

#[test]
fn callers_without_full_access_get_caller_info_only_when_given() {
    let f = Function::from_builtin("caller_name", caller_name, CallStrategy::Direct, vec![]);
    let err = dispatcher().apply(&f, None, Value::Unit, vec![]).unwrap_err();
    assert_eq!(err.to_string(), "caller info missing");
}

#[test]
fn state_is_threaded_through_calls() {
    let f = Function::from_builtin("state", state_body, CallStrategy::Direct, vec![]);
    let result = dispatcher()
        .apply(&f, None, Value::from("ctx"), vec![])
        .unwrap();
    assert_eq!(result, Value::from("ctx"));
}

#[test]
fn callee_failures_propagate_unchanged() {
    let f = Function::from_builtin(
        "boom",
        |_| Err(RuntimeError::failure("boom")),
        CallStrategy::CallLoop,
        vec![],
    );
    let err = dispatcher().apply(&f, None, Value::Unit, vec![]).unwrap_err();
    assert!(matches!(err, RuntimeError::Failure(ref message) if message == "boom"));
}
