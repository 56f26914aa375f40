//! Layout grammar: container widths, gutters, grid rules and card minimums
//! per breakpoint.

use crate::types::{ComponentType, ContainerStep, GridRule, Gutter, LayoutGrammar, Sample};

/// Gutters kept per breakpoint.
const GUTTERS_PER_BREAKPOINT: usize = 3;

pub fn build_layout_grammar(samples: &[Sample]) -> LayoutGrammar {
    let mut layout = LayoutGrammar::default();

    for sample in samples {
        let style = |prop: &str| sample.computed.get(prop).cloned();
        match sample.component_type {
            ComponentType::Container => {
                layout.container_steps.push(ContainerStep {
                    breakpoint: sample.breakpoint.clone(),
                    width: style("width"),
                    max_width: style("max-width"),
                    padding_left: style("padding-left"),
                    padding_right: style("padding-right"),
                });
                if !sample.breakpoint.is_empty() {
                    let gutters = layout.gutters.entry(sample.breakpoint.clone()).or_default();
                    if gutters.len() < GUTTERS_PER_BREAKPOINT {
                        gutters.push(Gutter {
                            left: style("padding-left"),
                            right: style("padding-right"),
                        });
                    }
                }
            }
            ComponentType::GridContainer => layout.grid_rules.push(GridRule {
                display: style("display"),
                grid_template: style("grid-template-columns"),
                gap: style("gap"),
                breakpoint: sample.breakpoint.clone(),
            }),
            ComponentType::Card if sample.bbox.width > 0.0 => {
                layout
                    .min_card_width
                    .entry(sample.breakpoint.clone())
                    .and_modify(|w| *w = w.min(sample.bbox.width))
                    .or_insert(sample.bbox.width);
            }
            _ => {}
        }
    }

    layout
}
