use circuitcmd::{
    CollapsedBatch, CollapserAnnotation, CommandAction, CommandAnnotation, CommandError,
    CommandResolver, InvocationMetadata, MissingFallbackPolicy, ParamType, ResolverConfig, Value,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use fixtures::{PaymentService, RecordingEngine, metadata_for, payment_registry, target};

fn resolver_with_engine(
    charge: CommandAnnotation,
    config: ResolverConfig,
) -> (CommandResolver, Arc<RecordingEngine>) {
    let engine = Arc::new(RecordingEngine::default());
    let resolver = CommandResolver::with_config(payment_registry(charge), engine.clone(), config);
    (resolver, engine)
}

fn resolver_for(charge: CommandAnnotation) -> (CommandResolver, Arc<RecordingEngine>) {
    resolver_with_engine(charge, ResolverConfig::default())
}

#[test]
fn empty_fallback_name_yields_no_fallback() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method(""));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);

    let fallback = resolver
        .resolve_fallback(&metadata, &CollapsedBatch::empty())
        .unwrap();

    assert!(fallback.is_none());
}

#[test]
fn plain_fallback_is_a_direct_call_with_same_arguments() {
    let (resolver, engine) = resolver_for(CommandAnnotation::new().fallback_method("chargeFallback"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 25.5);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let fallback = description.actions().fallback().unwrap();
    let direct = fallback.as_direct().unwrap();

    assert_eq!(direct.method().name(), "chargeFallback");
    assert_eq!(direct.args(), &[Value::Float(25.5)]);
    assert!(direct.target().same_instance(&target));
    assert_eq!(
        fallback.execute().unwrap(),
        Value::Text("fallback:25.5".to_string())
    );
    assert!(engine.runs().is_empty());
}

#[test]
fn protected_fallback_becomes_lazy_sub_command() {
    let (resolver, engine) =
        resolver_for(CommandAnnotation::new().fallback_method("chargeViaBackup"));
    let (service, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 10.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let fallback = description.actions().fallback().unwrap();
    let lazy = fallback.as_lazy().unwrap();

    let nested = lazy.metadata();
    assert_eq!(nested.default_command_key(), "chargeViaBackup");
    assert_eq!(nested.default_group_key(), metadata.default_group_key());
    assert_eq!(nested.default_collapser_key(), metadata.default_collapser_key());
    assert_eq!(nested.args(), metadata.args());
    assert_eq!(nested.method().name(), "chargeViaBackup");
    assert_eq!(lazy.action_name(), "chargeViaBackup");

    // resolving the outer command must not have touched the fallback
    assert_eq!(service.backup_calls.load(Ordering::SeqCst), 0);
    assert!(engine.runs().is_empty());

    let nested_description = resolver
        .resolve(nested, lazy.collapsed())
        .unwrap();
    assert_eq!(nested_description.group_key(), "payments");
    assert_eq!(nested_description.command_key(), "chargeViaBackup");
}

#[test]
fn lazy_fallback_dispatches_through_engine_when_invoked() {
    let (resolver, engine) =
        resolver_for(CommandAnnotation::new().fallback_method("chargeViaBackup"));
    let (service, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 10.0);
    let batch = CollapsedBatch::from_arguments([Value::Float(10.0), Value::Float(4.0)]);

    let description = resolver.resolve(&metadata, &batch).unwrap();
    let fallback = description.actions().fallback().unwrap();

    assert_eq!(fallback.execute().unwrap(), Value::Text("backup:10".to_string()));
    assert_eq!(service.backup_calls.load(Ordering::SeqCst), 1);

    let runs = engine.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].group_key, "payments");
    assert_eq!(runs[0].command_key, "chargeViaBackup");
    assert!(runs[0].batch.same_batch(&batch));
}

#[test]
fn lazy_fallback_with_substitute_arguments() {
    let (resolver, engine) =
        resolver_for(CommandAnnotation::new().fallback_method("chargeViaBackup"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 10.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let fallback = description.actions().fallback().unwrap();

    assert_eq!(
        fallback.execute_with_args(&[Value::Float(2.5)]).unwrap(),
        Value::Text("backup:2.5".to_string())
    );
    assert!(matches!(
        fallback.execute_with_args(&[Value::from("two")]),
        Err(CommandError::InvalidMetadata(_))
    ));
    assert_eq!(engine.runs().len(), 1);
}

#[test]
fn direct_fallback_checks_substitute_argument_types() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("chargeFallback"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 3.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let fallback = description.actions().fallback().unwrap();

    assert_eq!(
        fallback.execute_with_args(&[Value::Float(1.5)]).unwrap(),
        Value::Text("fallback:1.5".to_string())
    );
    assert!(matches!(
        fallback.execute_with_args(&[Value::from("1.5")]),
        Err(CommandError::InvalidMetadata(_))
    ));
    assert!(matches!(
        description.actions().command().execute_with_args(&[]),
        Err(CommandError::InvalidMetadata(_))
    ));
}

#[test]
fn collapser_annotation_carried_into_fallback() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("chargeViaBackup"));
    let (_, target) = target();
    let method = resolver
        .registry()
        .find_on::<PaymentService>("charge", &[ParamType::Float])
        .unwrap();
    let metadata = InvocationMetadata::builder()
        .target(target)
        .method(method)
        .args(vec![Value::Float(1.0)])
        .collapser(Some(CollapserAnnotation::new("chargeAll").collapser_key("charges")))
        .default_collapser_key("chargeCollapser")
        .build()
        .unwrap();

    let fallback = resolver
        .resolve_fallback(&metadata, &CollapsedBatch::empty())
        .unwrap()
        .unwrap();
    let nested = fallback.as_lazy().unwrap().metadata();

    assert_eq!(
        nested.collapser_annotation().map(|c| c.batch_method.as_str()),
        Some("chargeAll")
    );
    assert_eq!(nested.default_collapser_key(), "chargeCollapser");
}

#[test]
fn unknown_fallback_method_fails() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("doesNotExist"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);

    let err = resolver
        .resolve(&metadata, &CollapsedBatch::empty())
        .unwrap_err();

    match err {
        CommandError::NoSuchFallbackMethod {
            method,
            signature,
            available,
            ..
        } => {
            assert_eq!(method, "doesNotExist");
            assert_eq!(signature, "FLOAT");
            assert!(available.is_empty());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn fallback_with_different_parameter_types_is_not_found() {
    // refund takes an INTEGER, charge a FLOAT
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("refund"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);

    let err = resolver
        .resolve(&metadata, &CollapsedBatch::empty())
        .unwrap_err();

    match err {
        CommandError::NoSuchFallbackMethod { available, .. } => {
            assert_eq!(available.len(), 1);
            assert!(available[0].ends_with("::refund(INTEGER)"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_fallback_can_be_ignored() {
    let (resolver, _) = resolver_with_engine(
        CommandAnnotation::new().fallback_method("doesNotExist"),
        ResolverConfig::new().missing_fallback(MissingFallbackPolicy::Ignore),
    );
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();

    assert!(description.actions().fallback().is_none());
}

#[test]
fn cyclic_fallback_chain_is_rejected() {
    let (resolver, _) = resolver_for(CommandAnnotation::new());
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "cycleA", 1.0);

    let err = resolver
        .resolve(&metadata, &CollapsedBatch::empty())
        .unwrap_err();

    assert_eq!(
        err,
        CommandError::CyclicFallback(vec![
            "cycleA".to_string(),
            "cycleB".to_string(),
            "cycleA".to_string(),
        ])
    );
}

#[test]
fn self_referencing_fallback_is_rejected() {
    let (resolver, _) = resolver_for(CommandAnnotation::new());
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "selfLoop", 1.0);

    let err = resolver
        .resolve(&metadata, &CollapsedBatch::empty())
        .unwrap_err();

    assert!(matches!(err, CommandError::CyclicFallback(chain) if chain.len() == 2));
}

#[test]
fn cycle_detection_can_be_disabled() {
    let (resolver, _) = resolver_with_engine(
        CommandAnnotation::new(),
        ResolverConfig::new().detect_cyclic_fallbacks(false),
    );
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "cycleA", 1.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let lazy = description.actions().fallback().unwrap().as_lazy().unwrap();

    assert_eq!(lazy.metadata().method().name(), "cycleB");
}

#[test]
fn acyclic_chain_through_plain_fallback_resolves() {
    let (resolver, _) = resolver_for(
        CommandAnnotation::new()
            .command_key("chargeViaBackup")
            .fallback_method("chargeFallback"),
    );
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);

    // a plain fallback ends the chain, even when keys would collide further on
    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();

    assert!(description.actions().fallback().unwrap().is_direct());
}

#[test]
fn acyclic_chain_of_protected_fallbacks_resolves() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("backupTier1"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 4.0);

    let description = resolver.resolve(&metadata, &CollapsedBatch::empty()).unwrap();
    let tier1 = description.actions().fallback().unwrap().as_lazy().unwrap();
    assert_eq!(tier1.action_name(), "backupTier1");

    let tier1_description = resolver.resolve(tier1.metadata(), tier1.collapsed()).unwrap();
    assert_eq!(tier1_description.group_key(), "backup");
    let tier2 = tier1_description.actions().fallback().unwrap().as_lazy().unwrap();
    assert_eq!(tier2.action_name(), "backupTier2");

    let tier2_description = resolver.resolve(tier2.metadata(), tier2.collapsed()).unwrap();
    let last = tier2_description.actions().fallback().unwrap();
    assert!(last.is_direct());
    assert_eq!(last.execute().unwrap(), Value::Text("fallback:4".to_string()));
}

#[test]
fn fallback_follows_handle_linked_at_build() {
    let (resolver, _) = resolver_for(CommandAnnotation::new().fallback_method("chargeViaBackup"));
    let (_, target) = target();
    let metadata = metadata_for(resolver.registry(), &target, "charge", 1.0);
    let backup = resolver
        .registry()
        .find_on::<PaymentService>("chargeViaBackup", &[ParamType::Float])
        .unwrap();

    let linked = metadata.method().fallback().unwrap().unwrap();
    assert!(Arc::ptr_eq(&linked, &backup));

    let fallback = resolver
        .resolve_fallback(&metadata, &CollapsedBatch::empty())
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(fallback.as_lazy().unwrap().metadata().method(), &backup));
}

#[test]
fn cycles_are_recorded_when_the_registry_is_built() {
    let registry = payment_registry(CommandAnnotation::new());
    let cycle_a = registry
        .find_on::<PaymentService>("cycleA", &[ParamType::Float])
        .unwrap();
    let charge = registry
        .find_on::<PaymentService>("charge", &[ParamType::Float])
        .unwrap();

    assert_eq!(cycle_a.fallback_cycle().unwrap(), ["cycleA", "cycleB", "cycleA"]);
    assert!(charge.fallback_cycle().is_none());
}
