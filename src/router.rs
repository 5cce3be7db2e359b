// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use nostr_feed::nip19;
use nostr_feed::ArticleAddress;

/// A view reachable through a path such as `/blog` or `/naddr1...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    About,
    Blog,
    Notes,
    HowItWorks,
    Cv,
    Article(ArticleAddress),
    NotFound(String),
}

impl Route {
    /// Resolve a path. Unknown paths and identifiers that are not article
    /// addresses resolve to [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let segment = path.trim().trim_start_matches('/').trim_end_matches('/');

        match segment {
            "" | "about" => Route::About,
            "blog" => Route::Blog,
            "notes" => Route::Notes,
            "how-it-works" => Route::HowItWorks,
            "cv" => Route::Cv,
            other if !other.contains('/') => match nip19::article_address(other) {
                Some(address) => Route::Article(address),
                None => Route::NotFound(path.to_string()),
            },
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::About => "/".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::Notes => "/notes".to_string(),
            Route::HowItWorks => "/how-it-works".to_string(),
            Route::Cv => "/cv".to_string(),
            Route::Article(address) => address
                .to_naddr()
                .map(|naddr| format!("/{naddr}"))
                .unwrap_or_else(|_| "/".to_string()),
            Route::NotFound(path) => path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_routes() {
        assert_eq!(Route::parse("/"), Route::About);
        assert_eq!(Route::parse("/blog"), Route::Blog);
        assert_eq!(Route::parse("notes/"), Route::Notes);
        assert_eq!(Route::parse("/how-it-works"), Route::HowItWorks);
        assert_eq!(Route::parse("/cv"), Route::Cv);
    }

    #[test]
    fn test_unparseable_segment_is_not_found() {
        assert_eq!(Route::parse("/naddr1garbage"), Route::NotFound("/naddr1garbage".to_string()));
        assert!(matches!(Route::parse("/blog/extra"), Route::NotFound(_)));
        assert!(matches!(
            Route::parse("/npub17pdf8saz8fflz3dqyst8rhfzav4s922yv0truw85nr02jxyxqr3shkl0gr"),
            Route::NotFound(_)
        ));
    }

    #[test]
    fn test_article_route_path_resolves_back() {
        let pubkey = nip19::pubkey_hex("npub17pdf8saz8fflz3dqyst8rhfzav4s922yv0truw85nr02jxyxqr3shkl0gr").unwrap();
        let route = Route::Article(ArticleAddress::new(30023, pubkey, "hello"));
        assert_eq!(Route::parse(&route.path()), route);
    }
}
