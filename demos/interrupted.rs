//! Interrupted demo: a large render is superseded halfway through.
//!
//! The first pass is stepped a few units at a time and then replaced. The
//! host only ever sees the second tree.

use weft::{
    create_element, Document, Engine, EngineConfig, IdleScheduler, Props, SteppedIdle, WorkStatus,
};

fn list(label: &str, len: usize) -> weft::Element {
    create_element(
        "ol",
        Props::new(),
        (0..len).map(|i| create_element("li", Props::new(), [format!("{label} {i}").into()]).into()),
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Weft Interrupted Render Demo");
    println!("============================");
    println!();

    let mut doc = Document::new();
    let container = doc.create_container("body");
    let mut engine = Engine::with_scheduler(doc, SteppedIdle::new(16), EngineConfig::default());

    engine.request_render(list("draft", 500), container);
    let mut stepper = SteppedIdle::new(16);
    for period in 1..=4 {
        stepper.request_idle_callback();
        if let Some(deadline) = stepper.next_idle() {
            if let WorkStatus::Yielded { units } = engine.on_idle(&deadline)? {
                println!(
                    "period {period}: {units} units, host children: {}",
                    engine.host().children(container).len()
                );
            }
        }
    }

    engine.request_render(list("final", 5), container);
    let stats = engine.run_until_idle()?;
    println!();
    println!("committed: {stats:?}");
    println!("{}", engine.host().inner_markup(container));
    for event in engine.drain_events() {
        println!("event: {event:?}");
    }

    Ok(())
}
