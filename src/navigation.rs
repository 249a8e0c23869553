// Navigation between the screens of the split flow

/// Parameters the split map screen is opened with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMapParams {
    pub file_reference: String,
    /// Opaque credential forwarded to the next screen without inspection
    pub access_token: String,
}

/// Parameters handed to the screen shown after a split point was picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSplitParams {
    pub file_reference: String,
    pub split_index: usize,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    SplitMap(SplitMapParams),
    PostSplit(PostSplitParams),
    Back,
}

/// Receives navigation requests issued by screens
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

/// Requests are queued and applied by the app shell once the frame is drawn
impl Navigator for Vec<Route> {
    fn navigate(&mut self, route: Route) {
        self.push(route);
    }
}
