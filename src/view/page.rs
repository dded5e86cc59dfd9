use serde_json::Value;

use crate::api::{ApiClient, ResourceKind};
use crate::view::controller::ViewController;
use crate::view::state::ViewState;

/// What a resource page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Collection,
    Item(String),
}

/// A list or detail page for one resource kind.
///
/// Collections settle to a JSON array, items to the object returned by the API.
#[derive(Debug)]
pub struct ResourcePage {
    kind: ResourceKind,
    target: PageTarget,
    controller: ViewController<Value>,
}

impl ResourcePage {
    pub fn collection(kind: ResourceKind) -> Self {
        Self {
            kind,
            target: PageTarget::Collection,
            controller: ViewController::new(),
        }
    }

    pub fn item(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            target: PageTarget::Item(id.into()),
            controller: ViewController::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn target(&self) -> &PageTarget {
        &self.target
    }

    pub fn state(&self) -> &ViewState<Value> {
        self.controller.state()
    }

    pub fn controller(&self) -> &ViewController<Value> {
        &self.controller
    }

    /// API path the page reads, which doubles as the controller key
    pub fn key(&self) -> String {
        match &self.target {
            PageTarget::Collection => self.kind.list_path(),
            PageTarget::Item(id) => self.kind.item_path(id),
        }
    }

    /// Mount the page and perform its single read
    pub async fn mount(&mut self, client: &ApiClient) -> &ViewState<Value> {
        let (kind, target, key) = (self.kind, self.target.clone(), self.key());
        self.controller
            .load(key, |_| fetch(client, kind, target))
            .await
    }

    /// Point an item page at another id (route parameter change)
    pub async fn show_item(&mut self, client: &ApiClient, id: impl Into<String>) -> &ViewState<Value> {
        self.target = PageTarget::Item(id.into());
        let (kind, target, key) = (self.kind, self.target.clone(), self.key());
        self.controller
            .reload(key, |_| fetch(client, kind, target))
            .await
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    pub fn into_state(self) -> ViewState<Value> {
        self.controller.into_state()
    }
}

async fn fetch(
    client: &ApiClient,
    kind: ResourceKind,
    target: PageTarget,
) -> Result<Value, crate::error::ClientError> {
    match target {
        PageTarget::Collection => client.fetch_list(kind).await.map(Value::Array),
        PageTarget::Item(id) => client.fetch_item(kind, &id).await,
    }
}
