//! Validation behavior across the library surface: the synthesizer refuses
//! stacks whose reference graph is broken, with useful errors.

use stackforge::error::Error;
use stackforge::intrinsics::Value;
use stackforge::resource::Resource;
use stackforge::stack::Stack;
use stackforge::synth::Synthesizer;

#[test]
fn dangling_reference_is_reported_with_referrer_and_target() {
    let mut stack = Stack::new("broken");
    stack
        .add_resource(
            Resource::new("alb-listener", "AWS::ElasticLoadBalancingV2::Listener")
                .with_property("LoadBalancerArn", Value::reference("alb")),
        )
        .unwrap();

    let err = Synthesizer::validate(&stack).unwrap_err();
    match err {
        Error::UnresolvedReference { referrer, target } => {
            assert_eq!(referrer, "resource 'AlbListener'");
            assert_eq!(target, "Alb");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mutual_references_are_reported_as_a_cycle() {
    let mut stack = Stack::new("cyclic");
    stack
        .add_resource(
            Resource::new("sg-a", "AWS::EC2::SecurityGroup")
                .with_property("Peer", Value::reference("sg-b")),
        )
        .unwrap();
    stack
        .add_resource(
            Resource::new("sg-b", "AWS::EC2::SecurityGroup")
                .with_property("Peer", Value::reference("sg-a")),
        )
        .unwrap();

    let err = Synthesizer::validate(&stack).unwrap_err();
    match err {
        Error::DependencyCycle { members } => {
            assert!(members.len() >= 3, "cycle should be closed: {members:?}");
            assert!(members.contains(&"SgA".to_string()));
            assert!(members.contains(&"SgB".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn self_reference_is_a_cycle() {
    let mut stack = Stack::new("self");
    stack
        .add_resource(
            Resource::new("group", "AWS::EC2::SecurityGroup").with_dependency("group"),
        )
        .unwrap();

    let err = Synthesizer::validate(&stack).unwrap_err();
    assert!(matches!(err, Error::DependencyCycle { .. }));
}

#[test]
fn valid_stack_passes_and_renders() {
    let mut stack = Stack::new("ok");
    stack
        .add_resource(Resource::new("vpc", "AWS::EC2::VPC"))
        .unwrap();
    stack
        .add_resource(
            Resource::new("subnet", "AWS::EC2::Subnet")
                .with_property("VpcId", Value::reference("vpc")),
        )
        .unwrap();
    stack.add_output("Network", Value::reference("vpc"));

    Synthesizer::validate(&stack).unwrap();
    let template = Synthesizer::render(&stack).unwrap();
    assert_eq!(template.resources.len(), 2);
    assert_eq!(template.outputs.len(), 1);
}

#[test]
fn empty_stack_is_trivially_valid() {
    let stack = Stack::new("empty");
    Synthesizer::validate(&stack).unwrap();
}
