use std::time::Duration;

use bson::oid::ObjectId;
use realty_services::dao::invitation::InvitationDao;
use reqwest::header::SET_COOKIE;
use serde_json::Value;

use super::test_app::TestApp;

pub const PASSWORD: &str = "Password123!";

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub access_token: String,
}

/// Pulls the session token out of a `Set-Cookie: access_token=...` header.
pub fn session_token(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            cookie
                .split(';')
                .next()
                .and_then(|pair| pair.trim().strip_prefix("access_token="))
                .filter(|token| !token.is_empty())
                .map(|token| token.to_string())
        })
}

/// A listing body that passes validation; tests override individual fields.
pub fn listing_body(overrides: Value) -> Value {
    let mut body = serde_json::json!({
        "name": "Casa Azul",
        "description": "Two storey house near the park",
        "address": "Av. Reforma 100",
        "type": "sell",
        "category": "House",
        "regularPrice": 250000.0,
        "offer": false,
        "currency": "USD",
        "bedrooms": 3,
        "bathrooms": 2.0,
        "constructionArea": 180.0,
        "landArea": 220.0,
        "imageUrls": ["https://img.example.com/casa-azul.jpg"],
    });

    if let (Some(base), Value::Object(extra)) = (body.as_object_mut(), overrides) {
        for (key, value) in extra {
            base.insert(key, value);
        }
    }
    body
}

impl TestApp {
    /// Sign up a regular user and sign them in.
    pub async fn register_user(&self, username: &str, email: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
            }))
            .send()
            .await
            .expect("Signup request failed");

        assert_eq!(
            resp.status().as_u16(),
            201,
            "Signup failed: {}",
            resp.text().await.unwrap_or_default()
        );

        self.signin(email, PASSWORD).await
    }

    /// Sign in and return the user with the token from the session cookie.
    pub async fn signin(&self, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/signin"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Signin request failed");

        assert!(resp.status().is_success(), "Signin failed: {}", resp.status());
        let access_token = session_token(&resp).expect("Signin set no session cookie");
        let json: Value = resp.json().await.expect("Failed to parse signin response");

        SeededUser {
            id: json["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            username: json["username"].as_str().unwrap().to_string(),
            access_token,
        }
    }

    /// Stores an invitation for `email` directly, bypassing the admin endpoint.
    pub async fn invite_directly(&self, email: &str) -> String {
        InvitationDao::new(&self.db)
            .create(email.to_string(), ObjectId::new(), Duration::from_secs(3600))
            .await
            .expect("Failed to store invitation")
            .token
    }

    /// Bootstraps an admin through the invitation flow.
    pub async fn seed_admin(&self, username: &str) -> SeededUser {
        let email = format!("{username}@realty.test");
        let token = self.invite_directly(&email).await;

        let resp = self
            .client
            .post(self.url("/api/auth/register-invited"))
            .json(&serde_json::json!({
                "username": username,
                "email": email,
                "password": PASSWORD,
                "phoneNumber": "+52 55 1234 5678",
                "token": token,
            }))
            .send()
            .await
            .expect("Register-invited request failed");

        assert_eq!(resp.status().as_u16(), 201, "Admin registration failed");
        let access_token = session_token(&resp).expect("Registration set no session cookie");
        let json: Value = resp.json().await.unwrap();

        SeededUser {
            id: json["id"].as_str().unwrap().to_string(),
            email,
            username: username.to_string(),
            access_token,
        }
    }

    /// Create an authenticated request with the given token.
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// A request with no session at all, from a client without a cookie jar.
    pub fn anonymous_get(&self, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().get(self.url(path))
    }

    pub fn anonymous_post(&self, path: &str) -> reqwest::RequestBuilder {
        reqwest::Client::new().post(self.url(path))
    }

    pub async fn create_listing(&self, owner: &SeededUser, overrides: Value) -> Value {
        let resp = self
            .auth_post("/api/listing/create", &owner.access_token)
            .json(&listing_body(overrides))
            .send()
            .await
            .expect("Create listing request failed");

        assert_eq!(
            resp.status().as_u16(),
            201,
            "Create listing failed: {}",
            resp.text().await.unwrap_or_default()
        );
        resp.json().await.unwrap()
    }

    pub async fn create_category(&self, admin: &SeededUser, name: &str) -> String {
        let resp = self
            .auth_post("/api/categories/create", &admin.access_token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Create category request failed");

        assert_eq!(resp.status().as_u16(), 201, "Create category failed");
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    pub async fn create_city(&self, admin: &SeededUser, name: &str, state: &str) -> String {
        let resp = self
            .auth_post("/api/cities/create", &admin.access_token)
            .json(&serde_json::json!({ "name": name, "state": state }))
            .send()
            .await
            .expect("Create city request failed");

        assert_eq!(resp.status().as_u16(), 201, "Create city failed");
        let json: Value = resp.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }

    /// Runs a listing search and returns the JSON array.
    pub async fn search(&self, query: &str) -> Vec<Value> {
        let resp = self
            .anonymous_get(&format!("/api/listing?{query}"))
            .send()
            .await
            .expect("Search request failed");

        assert_eq!(resp.status().as_u16(), 200, "Search failed for {query}");
        resp.json().await.unwrap()
    }
}
