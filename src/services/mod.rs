/*
 * Responsibility
 * - 認可ロジック (auth) と、それが使うキャッシュ (cache)
 * - HTTP / axum には依存しない
 */
pub mod auth;
pub mod cache;
