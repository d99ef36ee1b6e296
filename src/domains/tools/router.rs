//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! This is the single place where the server's fixed tool set is declared.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;
use crate::core::context::ServerContext;

use super::definitions::{ConvertWebpTool, ReadFileDiagnosticsTool, ReadFileTool};
use super::error::ToolError;
use super::registry::ToolRegistry;

/// Build a registry holding every tool the server exposes.
pub fn build_tool_registry(
    config: Arc<Config>,
    context: Arc<ServerContext>,
) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(ReadFileTool::new(config.clone(), context.clone()))?;
    registry.register(ReadFileDiagnosticsTool::new(config.clone(), context.clone()))?;
    registry.register(ConvertWebpTool::new(config, context))?;
    Ok(registry)
}

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(
    config: Arc<Config>,
    context: Arc<ServerContext>,
) -> Result<ToolRouter<S>, ToolError>
where
    S: Send + Sync + 'static,
{
    Ok(build_tool_registry(config, context)?.into_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestServer {}

    fn build() -> ToolRouter<TestServer> {
        build_tool_router(Arc::new(Config::default()), Arc::new(ServerContext::default())).unwrap()
    }

    #[test]
    fn test_build_router() {
        let router = build();
        let tools = router.list_all();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"read-file"));
        assert!(names.contains(&"read-file-diagnostics"));
        assert!(names.contains(&"convert_webp"));
    }

    #[test]
    fn test_registry_matches_router() {
        let config = Arc::new(Config::default());
        let context = Arc::new(ServerContext::default());
        let registry = build_tool_registry(config.clone(), context.clone()).unwrap();
        let registry_names: Vec<String> =
            registry.tool_names().into_iter().map(str::to_string).collect();

        let router: ToolRouter<TestServer> = build_tool_router(config, context).unwrap();
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.to_string()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_every_tool_requires_path() {
        for tool in build().list_all() {
            let required = tool.input_schema.get("required").and_then(|v| v.as_array());
            assert!(
                required.is_some_and(|r| r.iter().any(|v| v == "path")),
                "{} does not require `path`",
                tool.name
            );
        }
    }

    #[test]
    fn test_convert_tool_is_not_read_only() {
        let router = build();
        let convert = router
            .list_all()
            .into_iter()
            .find(|t| t.name == "convert_webp")
            .unwrap();
        let annotations = convert.annotations.unwrap();
        assert_eq!(annotations.read_only_hint, Some(false));
        assert!(convert.description.unwrap().contains("writes"));
    }
}
