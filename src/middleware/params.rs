use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Form,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, FragmentError};

/// Query string for full-page routes. Malformed input renders the error page.
#[derive(Debug)]
pub struct PageQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for PageQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(PageQuery(value))
    }
}

/// Query string for fragment routes. Malformed input renders a bare banner.
#[derive(Debug)]
pub struct FragmentQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for FragmentQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = FragmentError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(FragmentQuery(value))
    }
}

/// Urlencoded form body; rejections become [`AppError::BadRequest`].
#[derive(Debug)]
pub struct PageForm<T>(pub T);

impl<T, S> FromRequest<S> for PageForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state).await?;
        Ok(PageForm(value))
    }
}
