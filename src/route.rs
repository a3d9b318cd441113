//! Hash-based navigation: `#/`, `#/episodes?show=<id>`,
//! `#/practice?show=<id>&episode=<n>`. The bare home path with a `show`
//! parameter lists that show's episodes too.

use crate::utils::parse_int_prefix;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Episodes { show: String },
    Practice { show: String, episode: u32 },
}

impl Route {
    /// Builds a route from a path and its query parameters. The episode is
    /// read by its leading integer (`"2abc"` is 2). A practice route without
    /// both parameters, or with an episode that is not a positive integer,
    /// falls back to `Home`.
    pub fn from_params(path: &str, show: Option<&str>, episode: Option<&str>) -> Route {
        let show = show.filter(|s| !s.is_empty());
        match path.trim_matches('/') {
            "" | "episodes" => match show {
                Some(show) => Route::Episodes { show: show.to_string() },
                None => Route::Home,
            },
            "practice" => {
                let episode = episode
                    .and_then(parse_int_prefix)
                    .and_then(|e| u32::try_from(e).ok())
                    .filter(|&e| e >= 1);
                match (show, episode) {
                    (Some(show), Some(episode)) => Route::Practice {
                        show: show.to_string(),
                        episode,
                    },
                    _ => Route::Home,
                }
            }
            _ => Route::Home,
        }
    }

    /// Parses a `location.hash` value; query values are percent-decoded.
    pub fn parse(hash: &str) -> Route {
        let hash = hash.trim_start_matches('#');
        let (path, query) = hash.split_once('?').unwrap_or((hash, ""));
        let mut show = None;
        let mut episode = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                "show" if show.is_none() => show = Some(value.into_owned()),
                "episode" if episode.is_none() => episode = Some(value.into_owned()),
                _ => {}
            }
        }
        Route::from_params(path, show.as_deref(), episode.as_deref())
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Home => "#/".to_string(),
            Route::Episodes { show } => format!("#/episodes?show={}", encode(show)),
            Route::Practice { show, episode } => {
                format!("#/practice?show={}&episode={episode}", encode(show))
            }
        }
    }

    /// Where "back" leads from a screen that knows (or doesn't know) its show.
    pub fn episodes_or_home(show: Option<&str>) -> Route {
        match show {
            Some(show) if !show.is_empty() => Route::Episodes { show: show.to_string() },
            _ => Route::Home,
        }
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
