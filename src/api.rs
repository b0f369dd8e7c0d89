//! Typed GraphQL query contracts.
//!
//! Field names are the wire contract and are reproduced exactly; the payload
//! records are opaque to the query engine, which only carries them. Each
//! operation has a query string, a response record, and an [`Api`] method
//! returning a `'static` future suitable for [`QueryHandle::start`].
//!
//! [`QueryHandle::start`]: crate::query::QueryHandle::start

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::transport::{GraphqlClient, QueryError};

pub const GET_CHARACTERS: &str = "\
query GetCharacters {
  characters {
    results {
      id
      name
      image
    }
  }
}";

pub const GET_CHARACTER: &str = "\
query GetCharacter($id: ID!) {
  character(id: $id) {
    id
    name
    image
    episode {
      name
      episode
    }
  }
}";

pub const SEARCH_CHARACTER: &str = "\
query SearchCharacter($name: String!) {
  characters(filter: { name: $name }) {
    results {
      id
      name
      image
      location {
        name
      }
    }
  }
}";

pub const GET_USER: &str = "\
query GetUser($id: Int!) {
  getUser(id: $id) {
    email
    id
    username
    posts {
      id
      title
      content
    }
  }
}";

/// A page of results as the API returns them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,
}

/// `GetCharacters` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterListData {
    pub characters: Page<CharacterSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterSummary {
    pub id: String,
    pub name: String,
    pub image: String,
}

/// `GetCharacter` response. `character` is null for an unknown id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterData {
    pub character: Option<Character>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub image: String,
    pub episode: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Episode {
    pub name: String,
    /// Episode code, e.g. "S01E01".
    pub episode: String,
}

/// `SearchCharacter` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchData {
    pub characters: Page<CharacterHit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterHit {
    pub id: String,
    pub name: String,
    pub image: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Location {
    pub name: String,
}

/// `GetUser` response. `getUser` is null for an unknown id.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserData {
    #[serde(rename = "getUser")]
    pub get_user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
}

/// The query surface of the remote API, bound to a shared transport.
#[derive(Debug, Clone)]
pub struct Api {
    transport: Arc<GraphqlClient>,
}

impl Api {
    pub fn new(transport: Arc<GraphqlClient>) -> Self {
        Self { transport }
    }

    /// Fetch the character roster shown on the list screen.
    pub fn characters(
        &self,
    ) -> impl Future<Output = Result<CharacterListData, QueryError>> + Send + 'static {
        let transport = self.transport.clone();
        async move {
            transport
                .execute("GetCharacters", GET_CHARACTERS, json!({}))
                .await
        }
    }

    /// Fetch one character with its episode list.
    pub fn character(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<CharacterData, QueryError>> + Send + 'static {
        let transport = self.transport.clone();
        let variables = json!({ "id": id });
        async move {
            transport
                .execute("GetCharacter", GET_CHARACTER, variables)
                .await
        }
    }

    /// Search characters by name.
    pub fn search(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<SearchData, QueryError>> + Send + 'static {
        let transport = self.transport.clone();
        let variables = json!({ "name": name });
        async move {
            transport
                .execute("SearchCharacter", SEARCH_CHARACTER, variables)
                .await
        }
    }

    /// Fetch one user with their posts.
    pub fn user(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<UserData, QueryError>> + Send + 'static {
        let transport = self.transport.clone();
        let variables = json!({ "id": id });
        async move { transport.execute("GetUser", GET_USER, variables).await }
    }
}
