// msf_core/examples/configure_filter.rs
//
// Configures a three-sensor error-state filter, composes its state schema
// and prints where everything landed in both state vectors.

use msf_core::prelude::*;
use std::any::Any;

#[derive(Debug, Clone)]
struct CameraModule {
    id: ModuleId,
    focal_length_px: f64,
}

impl SensorModule for CameraModule {
    fn id(&self) -> &ModuleId {
        &self.id
    }

    fn describe(&self) -> String {
        format!("camera '{}' (f = {} px)", self.id, self.focal_length_px)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Clone)]
struct PlainModule {
    id: ModuleId,
}

impl SensorModule for PlainModule {
    fn id(&self) -> &ModuleId {
        &self.id
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // --- 1. Declare the sensor configuration ---
    // The camera estimates a time offset (1 linear state) and its
    // body-to-camera extrinsic rotation (1 rotational block).
    let descriptors = vec![
        ModuleDescriptor::new("gps", 3, 0, 0),
        ModuleDescriptor::new("baro", 1, 1, 0),
        ModuleDescriptor::new("camera", 2, 1, 1),
    ];

    // --- 2. Compose the schema and build storage against it ---
    let schema = StateSchema::compose(&descriptors)?;
    let storage = ModuleStorage::new(
        &schema,
        vec![
            Box::new(PlainModule {
                id: ModuleId::from("gps"),
            }),
            Box::new(PlainModule {
                id: ModuleId::from("baro"),
            }),
            Box::new(CameraModule {
                id: ModuleId::from("camera"),
                focal_length_px: 458.0,
            }),
        ],
    )?;

    println!(
        "nominal dim = {}, error dim = {}",
        schema.nominal_dim(),
        schema.error_dim()
    );

    for label in CoreState::ALL {
        let n = schema.resolve_core(label, StateSpace::Nominal);
        let e = schema.resolve_core(label, StateSpace::Error);
        println!(
            "core {label:?}: nominal {:?}, error {:?}",
            n.as_range(),
            e.as_range()
        );
    }

    for module in storage.iter() {
        let span = schema.module_span(module.id(), StateSpace::Nominal)?;
        println!("{} -> nominal {:?}", module.describe(), span.as_range());
    }

    // --- 3. Allocate the filter's numeric containers ---
    let state = FilterState::new(schema, 0.1, 0.0);
    println!(
        "initial attitude quaternion [x, y, z, w] = {:?}",
        state.core(CoreState::Attitude)
    );

    Ok(())
}
