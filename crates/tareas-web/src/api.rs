use async_trait::async_trait;
use gloo::net::http::{
  Request,
  RequestBuilder,
  Response
};
use serde::de::DeserializeOwned;
use tareas_core::ClientError;
use tareas_core::remote::{
  Endpoint,
  Method,
  TaskRemote
};
use tareas_shared::{
  Task,
  TaskId,
  TitleBody
};

/// `TaskRemote` over `fetch`. One attempt
/// per call; no timeout.
pub struct HttpRemote {
  base: String
}

impl HttpRemote {
  pub fn new(
    base: impl Into<String>
  ) -> Self {
    Self { base: base.into() }
  }

  async fn send(
    &self,
    endpoint: &Endpoint<'_>,
    body: Option<&TitleBody>
  ) -> Result<Response, ClientError> {
    let url = endpoint.url(&self.base);
    let builder = request_for(
      endpoint.method(),
      &url
    );

    let request = match body {
      | Some(payload) => {
        builder.json(payload)
      }
      | None => builder.build()
    }
    .map_err(|err| {
      tracing::error!(%url, error = %err, "failed to build request");
      endpoint.transport_error()
    })?;

    let response =
      request.send().await.map_err(
        |err| {
          tracing::error!(%url, error = %err, "request failed");
          endpoint.transport_error()
        }
      )?;

    let status = response.status();
    let rejection = if status == 400
      && endpoint.reports_validation()
    {
      response.text().await.ok()
    } else {
      None
    };

    endpoint
      .classify(status, rejection.as_deref())?;
    Ok(response)
  }
}

fn request_for(
  method: Method,
  url: &str
) -> RequestBuilder {
  match method {
    | Method::Get => Request::get(url),
    | Method::Post => Request::post(url),
    | Method::Put => Request::put(url),
    | Method::Delete => {
      Request::delete(url)
    }
  }
}

async fn decode<T>(
  endpoint: &Endpoint<'_>,
  response: Response
) -> Result<T, ClientError>
where
  T: DeserializeOwned
{
  response.json::<T>().await.map_err(
    |err| {
      tracing::error!(
        method = endpoint.method().as_str(),
        error = %err,
        "unexpected response body"
      );
      endpoint.transport_error()
    }
  )
}

#[async_trait(?Send)]
impl TaskRemote for HttpRemote {
  async fn list(
    &self
  ) -> Result<Vec<Task>, ClientError> {
    let endpoint = Endpoint::List;
    let response =
      self.send(&endpoint, None).await?;
    decode(&endpoint, response).await
  }

  async fn create(
    &self,
    titulo: &str
  ) -> Result<Task, ClientError> {
    let endpoint = Endpoint::Create;
    let body = TitleBody {
      titulo: titulo.to_string()
    };
    let response = self
      .send(&endpoint, Some(&body))
      .await?;
    decode(&endpoint, response).await
  }

  async fn toggle(
    &self,
    id: &TaskId
  ) -> Result<Task, ClientError> {
    let endpoint = Endpoint::Toggle(id);
    let response =
      self.send(&endpoint, None).await?;
    decode(&endpoint, response).await
  }

  async fn update(
    &self,
    id: &TaskId,
    titulo: &str
  ) -> Result<Task, ClientError> {
    let endpoint = Endpoint::Update(id);
    let body = TitleBody {
      titulo: titulo.to_string()
    };
    let response = self
      .send(&endpoint, Some(&body))
      .await?;
    decode(&endpoint, response).await
  }

  async fn delete(
    &self,
    id: &TaskId
  ) -> Result<(), ClientError> {
    // The body of a delete is not part
    // of the contract; 204 is fine.
    self
      .send(&Endpoint::Delete(id), None)
      .await
      .map(|_| ())
  }
}
