//! Welcome demo: render, update and shrink a small tree through the engine.
//!
//! Run with `RUST_LOG=debug cargo run --example welcome` to see each commit.

use weft::{create_element, Document, Engine, EventHandler, Props, RenderEvent};

fn page(title: &str, items: &[&str]) -> weft::Element {
    create_element(
        "div",
        Props::new()
            .with("id", "foo")
            .with("onClick", EventHandler::new(|event| println!("  clicked: {}", event.name))),
        [
            create_element("h1", Props::new(), [title.into()]).into(),
            create_element(
                "ul",
                Props::new(),
                items
                    .iter()
                    .map(|item| create_element("li", Props::new(), [(*item).into()]).into()),
            )
            .into(),
        ],
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Weft Welcome Demo");
    println!("=================");
    println!();

    let mut doc = Document::new();
    let container = doc.create_container("body");
    let mut engine = Engine::new(doc)?;
    let handle = engine.handle();

    let steps: [(&str, &[&str]); 3] = [
        ("Welcome", &["one", "two", "three"]),
        ("Welcome back", &["one", "two", "three"]),
        ("Goodbye", &["one"]),
    ];

    for (title, items) in steps {
        handle.render(page(title, items), container);
        engine.run_until_idle()?;

        for event in engine.drain_events() {
            if let RenderEvent::Committed(stats) = event {
                println!(
                    "pass {}: {} placed, {} updated, {} deleted",
                    stats.pass, stats.placements, stats.updates, stats.deletions
                );
            }
        }
        println!("  {}", engine.host().inner_markup(container));
        println!("  host mutations so far: {}", engine.host().stats().mutations());
    }

    let div = engine.host().children(container)[0];
    let header = engine.host().children(div)[0];
    engine.host().dispatch(header, "click");

    Ok(())
}
