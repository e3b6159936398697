pub mod dto;
pub mod http;
pub mod rendering;
pub mod services;
pub mod websocket;

/// DOM status around the chart, kept apart from the chart data itself
pub mod ui {
    use crate::application::ChartElements;
    use crate::domain::{
        errors::{ChartError, ChartResult},
        logging::{LogComponent, get_logger},
    };
    use web_sys::{Document, Element};

    #[derive(Clone, Debug)]
    pub struct ChartNotificationService {
        elements: ChartElements,
    }

    impl ChartNotificationService {
        pub fn new(elements: ChartElements) -> Self {
            Self { elements }
        }

        pub fn elements(&self) -> &ChartElements {
            &self.elements
        }

        /// Chart visible, error and fallback hidden.
        pub fn show_chart(&self) -> ChartResult<()> {
            let document = document()?;
            if let Some(chart) = document.get_element_by_id(&self.elements.chart) {
                set_hidden(&chart, false)?;
            }
            if let Some(error) = document.get_element_by_id(&self.elements.error) {
                error.set_text_content(None);
                set_hidden(&error, true)?;
            }
            if let Some(fallback) = self.fallback(&document) {
                set_hidden(&fallback, true)?;
            }
            Ok(())
        }

        /// Replaces the chart with an inline error message.
        pub fn show_inline_error(&self, message: &str) -> ChartResult<()> {
            get_logger().debug(
                LogComponent::Infrastructure("UI"),
                &format!("Showing chart error: {message}"),
            );
            let document = document()?;
            if let Some(chart) = document.get_element_by_id(&self.elements.chart) {
                set_hidden(&chart, true)?;
            }
            match document.get_element_by_id(&self.elements.error) {
                Some(error) => {
                    error.set_text_content(Some(message));
                    set_hidden(&error, false)?;
                }
                None => get_logger().warn(
                    LogComponent::Infrastructure("UI"),
                    &format!("Error element '{}' not found in DOM", self.elements.error),
                ),
            }
            Ok(())
        }

        /// Hides the chart and reveals the default view when one is configured.
        pub fn show_no_data(&self, reason: &str) -> ChartResult<()> {
            get_logger().debug(
                LogComponent::Infrastructure("UI"),
                &format!("No chart data: {reason}"),
            );
            let document = document()?;
            if let Some(chart) = document.get_element_by_id(&self.elements.chart) {
                set_hidden(&chart, true)?;
            }
            if let Some(error) = document.get_element_by_id(&self.elements.error) {
                set_hidden(&error, true)?;
            }
            if let Some(fallback) = self.fallback(&document) {
                set_hidden(&fallback, false)?;
            }
            Ok(())
        }

        fn fallback(&self, document: &Document) -> Option<Element> {
            self.elements.fallback.as_deref().and_then(|id| document.get_element_by_id(id))
        }
    }

    fn document() -> ChartResult<Document> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ChartError::Render("document not available".to_string()))
    }

    fn set_hidden(element: &Element, hidden: bool) -> ChartResult<()> {
        let result = if hidden {
            element.set_attribute("hidden", "")
        } else {
            element.remove_attribute("hidden")
        };
        result.map_err(|e| ChartError::Render(format!("failed to toggle '{}': {e:?}", element.id())))
    }
}
