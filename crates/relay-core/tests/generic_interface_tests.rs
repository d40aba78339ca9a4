// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]
use std::sync::Arc;

use relay_core::{
    configure_generic_instance, generate_any_data_points, generic_point_count, strings,
    ConnectionHub, GenericConfigError, InterfaceSpec, PortId, TypeId, Value,
};

fn synthesize(config: &str) -> Result<Arc<InterfaceSpec>, GenericConfigError> {
    let count = generic_point_count(config)?;
    let with: Vec<u32> = (0..count as u32).collect();
    let mut builder = InterfaceSpec::builder().event_output("CNF", &[]);
    for point in generate_any_data_points("IN", count)? {
        let name = strings::resolve(point.name).expect("interned name");
        builder = builder.data_input(name, point.ty);
    }
    Ok(builder.event_input("REQ", &with).build()?)
}

#[test]
fn five_point_config_yields_generic_in1_to_in5() {
    let hub = ConnectionHub::new();
    let inst = configure_generic_instance("G1", "GEN_PASS_5", hub, synthesize)
        .expect("configuration");
    let spec = inst.spec();
    assert_eq!(spec.data_input_count(), 5);
    for (i, expected) in ["IN1", "IN2", "IN3", "IN4", "IN5"].iter().enumerate() {
        let point = spec.data_input(PortId::new(i as u32)).expect("point");
        assert_eq!(strings::resolve(point.name), Some(*expected));
        assert_eq!(point.ty, TypeId::Any);
        assert_eq!(inst.data_input(PortId::new(i as u32)), Some(&Value::Any));
    }
}

#[test]
fn twelve_point_config_rolls_the_tens_digit() {
    let hub = ConnectionHub::new();
    let inst = configure_generic_instance("G2", "GEN_PASS_12", hub, synthesize)
        .expect("configuration");
    let spec = inst.spec();
    assert_eq!(spec.data_input_count(), 12);
    let ninth = spec.data_input(PortId::new(8)).expect("IN9");
    let tenth = spec.data_input(PortId::new(9)).expect("IN10");
    assert_eq!(strings::resolve(ninth.name), Some("IN9"));
    assert_eq!(strings::resolve(tenth.name), Some("IN10"));
}

#[test]
fn bad_configs_leave_no_instance_behind() {
    for config in ["GEN_PASS", "GEN_PASS_0", "GEN_PASS_1000", "GEN_PASS_X"] {
        let hub = ConnectionHub::new();
        assert!(
            configure_generic_instance("G", config, hub, synthesize).is_err(),
            "{config} must fail closed"
        );
    }
}

#[test]
fn each_instance_owns_its_synthesized_spec() {
    let hub = ConnectionHub::new();
    let a = configure_generic_instance("A", "GEN_PASS_2", Arc::clone(&hub), synthesize)
        .expect("configuration");
    let b = configure_generic_instance("B", "GEN_PASS_3", hub, synthesize)
        .expect("configuration");
    assert_eq!(a.spec().data_input_count(), 2);
    assert_eq!(b.spec().data_input_count(), 3);
    assert!(!Arc::ptr_eq(a.spec(), b.spec()));
}
