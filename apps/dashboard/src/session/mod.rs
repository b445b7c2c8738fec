//! Session store: captures the signed-in identity from the login redirect,
//! persists it, and restores it on later starts.
//!
//! The login provider redirects back with `?token=..&name=..&pic=..`. The
//! three values are persisted under individual keys; the token is also what
//! publishing sends to the backend.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::storage::{SharedStore, StorageError, TOKEN_KEY, USER_NAME_KEY, USER_PIC_KEY};

mod location;

pub use location::{Location, MemoryLocation};

/// Shown when the provider sends no usable name.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

const TOKEN_PARAM: &str = "token";
const NAME_PARAM: &str = "name";
const PIC_PARAM: &str = "pic";
const AUTH_PARAMS: [&str; 3] = [TOKEN_PARAM, NAME_PARAM, PIC_PARAM];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub auth_token: Option<String>,
}

impl Identity {
    /// Builds an identity, substituting [`DEFAULT_DISPLAY_NAME`] for a blank
    /// name and dropping blank avatar URLs and tokens.
    pub fn new(display_name: Option<&str>, avatar_url: Option<&str>, auth_token: Option<&str>) -> Self {
        Self {
            display_name: non_blank(display_name)
                .unwrap_or(DEFAULT_DISPLAY_NAME)
                .to_string(),
            avatar_url: non_blank(avatar_url).map(str::to_string),
            auth_token: non_blank(auth_token).map(str::to_string),
        }
    }

    /// First word of the display name, for greetings.
    pub fn first_name(&self) -> &str {
        self.display_name
            .split_whitespace()
            .next()
            .unwrap_or(&self.display_name)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Auth parameters carried by a redirect location, percent-decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectParams {
    pub token: Option<String>,
    pub name: Option<String>,
    pub pic: Option<String>,
}

impl RedirectParams {
    pub fn from_url(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                TOKEN_PARAM => params.token = Some(value.into_owned()),
                NAME_PARAM => params.name = Some(value.into_owned()),
                PIC_PARAM => params.pic = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    pub fn has_token(&self) -> bool {
        non_blank(self.token.as_deref()).is_some()
    }
}

/// `url` without its auth parameters. Other query parameters survive; an
/// emptied query is removed entirely.
fn strip_auth_params(url: &Url) -> Url {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !AUTH_PARAMS.contains(&key.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut stripped = url.clone();
    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persists an identity from redirect parameters. Returns `None`, and
    /// writes nothing, when the parameters carry no token. A failed write
    /// removes the keys already written, so storage never holds half a session.
    pub fn capture(&self, params: &RedirectParams) -> Result<Option<Identity>, StorageError> {
        if !params.has_token() {
            return Ok(None);
        }
        let identity = Identity::new(
            params.name.as_deref(),
            params.pic.as_deref(),
            params.token.as_deref(),
        );

        // Token goes last so it is never stored without a name.
        let writes = [
            (USER_NAME_KEY, identity.display_name.as_str()),
            (USER_PIC_KEY, identity.avatar_url.as_deref().unwrap_or_default()),
            (TOKEN_KEY, identity.auth_token.as_deref().unwrap_or_default()),
        ];
        let mut written = Vec::with_capacity(writes.len());
        for (key, value) in writes {
            if let Err(e) = self.store.set(key, value) {
                warn!("Session capture failed writing {key}: {e}");
                self.roll_back(&written);
                return Err(e);
            }
            written.push(key);
        }

        info!("Captured session for {}", identity.display_name);
        Ok(Some(identity))
    }

    fn roll_back(&self, keys: &[&str]) {
        for key in keys {
            if let Err(e) = self.store.remove(key) {
                warn!("Could not roll back {key}: {e}");
            }
        }
    }

    /// Captures from the current location and, on success, replaces the
    /// location with one stripped of its auth parameters.
    pub fn capture_from_redirect(
        &self,
        location: &mut dyn Location,
    ) -> Result<Option<Identity>, StorageError> {
        let current = location.current();
        let Some(identity) = self.capture(&RedirectParams::from_url(&current))? else {
            return Ok(None);
        };
        location.replace(strip_auth_params(&current));
        Ok(Some(identity))
    }

    /// Rebuilds the identity from storage, if a name was stored.
    pub fn restore(&self) -> Option<Identity> {
        let name = self.store.get(USER_NAME_KEY)?;
        if name.trim().is_empty() {
            return None;
        }
        let pic = self.store.get(USER_PIC_KEY);
        let token = self.store.get(TOKEN_KEY);
        debug!("Restored session for {name}");
        Some(Identity::new(Some(&name), pic.as_deref(), token.as_deref()))
    }

    /// Startup sequence: a redirect capture takes precedence over storage.
    pub fn bootstrap(&self, location: &mut dyn Location) -> Result<Option<Identity>, StorageError> {
        match self.capture_from_redirect(location)? {
            Some(identity) => Ok(Some(identity)),
            None => Ok(self.restore()),
        }
    }

    /// The persisted token, read at the moment it is needed.
    pub fn token(&self) -> Option<String> {
        self.store
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    /// Clears every identity key. Safe to call without a session.
    pub fn logout(&self) -> Result<(), StorageError> {
        for key in [TOKEN_KEY, USER_NAME_KEY, USER_PIC_KEY] {
            self.store.remove(key)?;
        }
        info!("Session cleared");
        Ok(())
    }
}
