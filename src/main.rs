use padless::{parse, Plan};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const DEMO: &str = "u8, i32, u8, i32, u8, f64, u8";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let arguments = std::env::args().skip(1).collect::<Vec<_>>();
    let source = if arguments.is_empty() {
        DEMO.into()
    } else {
        arguments.join(" ")
    };
    let plan = Plan::new(parse::types(&source)?);
    if plan.arity() == 0 {
        tracing::warn!(%source, "empty type list");
    }
    report(&plan)
}

fn report(plan: &Plan) -> anyhow::Result<()> {
    let names = |types: &[padless::TypeMeta]| {
        types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    tracing::info!(types = %names(plan.types()), "declared");
    tracing::info!(permutation = %plan.permutation(), inverse = %plan.inverse(), "planned");
    let reordered = plan.reordered()?;
    tracing::info!(types = %names(&reordered), "reordered");

    let optimized = plan.optimized()?;
    for (slot, layout) in optimized.slots.iter().enumerate() {
        let logical = plan.permutation().logical(slot)?;
        tracing::info!(
            slot,
            logical,
            ty = %plan.types()[logical],
            offset = layout.offset,
            padding = layout.padding,
            "slot"
        );
    }
    let (naive, data) = (plan.naive()?, plan.data_size()?);
    tracing::info!(
        optimized = optimized.size,
        naive = naive.size,
        data,
        align = optimized.align,
        "size"
    );
    if plan.is_identity() {
        tracing::info!("declaration order is already optimal");
    } else {
        let savings = plan.savings()?;
        tracing::info!(savings, "bytes saved over declaration order");
    }
    Ok(())
}
