pub mod focus;
pub mod search_panel;
pub mod sidebar;
pub mod text_reader;

pub use search_panel::{SearchPanel, SearchPanelAction};
pub use sidebar::{Sidebar, SidebarAction};
pub use text_reader::ArticleReader;
