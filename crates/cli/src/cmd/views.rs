use anyhow::Result;
use ctb_ir::{
    ComponentNavGroup, NavRow, NestedComponent, NestedComponents, SchemaGraph,
    components_with_nested_components, sorted_component_nav_groups, sorted_content_type_nav_list,
    transitively_nested_components,
};
use serde::Serialize;

use crate::args::SessionInput;
use crate::config::CliConfig;
use crate::{io, output};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsOut {
    pub content_types: Vec<NavRow>,
    pub components: Vec<ComponentNavGroup>,
    pub components_with_nested_components: Vec<NestedComponents>,
    pub nested_components: Vec<NestedComponent>,
}

impl ViewsOut {
    pub fn of(graph: &SchemaGraph) -> Self {
        Self {
            content_types: sorted_content_type_nav_list(graph),
            components: sorted_component_nav_groups(graph),
            components_with_nested_components: components_with_nested_components(graph),
            nested_components: transitively_nested_components(graph),
        }
    }
}

pub async fn run(config: &CliConfig, input: &SessionInput, pretty: bool) -> Result<()> {
    let replay = io::replay(&config.session, input, true).await?;
    let views = ViewsOut::of(&replay.session.current().schemas);
    io::emit(&views, pretty, None).await?;
    output::success(&format!(
        "{} content type(s), {} component categories",
        views.content_types.len(),
        views.components.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctb_ir::{Attribute, Component, ContentType};

    #[test]
    fn test_views_of_graph() {
        let graph = SchemaGraph::new()
            .with_content_type(ContentType::new("api::page.page", "page"))
            .with_content_type(ContentType::new("api::article.article", "Article"))
            .with_component(
                Component::new("default.hero", "default", "Hero")
                    .with_attribute(Attribute::component("cta", "default.link")),
            )
            .with_component(Component::new("default.link", "default", "Link"));

        let views = ViewsOut::of(&graph);
        let titles: Vec<_> = views.content_types.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Article", "page"]);
        assert_eq!(views.components.len(), 1);
        assert_eq!(views.components_with_nested_components.len(), 1);
        assert_eq!(views.nested_components[0].component, "default.link");

        let json = serde_json::to_value(&views).unwrap();
        assert!(json.get("componentsWithNestedComponents").is_some());
    }
}
