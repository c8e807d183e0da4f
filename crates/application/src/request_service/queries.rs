use super::*;

impl RequestService {
    /// Returns one request by id.
    pub async fn get_request(
        &self,
        actor: &UserIdentity,
        request_id: RequestId,
    ) -> AppResult<AccessRequest> {
        let stored = self.find_required(request_id).await?;
        request_access::require_view(actor, &stored.request)?;
        Ok(stored.request)
    }

    /// Lists every request, most recently written first. Manager only.
    pub async fn list_requests(&self, actor: &UserIdentity) -> AppResult<Vec<AccessRequest>> {
        request_access::require_manage(actor)?;
        self.repository.list(RequestFilter::All).await
    }

    /// Lists requests in one status, most recently written first. Manager
    /// only.
    pub async fn list_requests_by_status(
        &self,
        actor: &UserIdentity,
        status: RequestStatus,
    ) -> AppResult<Vec<AccessRequest>> {
        request_access::require_manage(actor)?;
        self.repository.list(RequestFilter::ByStatus(status)).await
    }

    /// Lists the actor's own requests, most recently written first.
    pub async fn list_my_requests(&self, actor: &UserIdentity) -> AppResult<Vec<AccessRequest>> {
        self.repository
            .list(RequestFilter::ByRequestor(actor.object_id().to_owned()))
            .await
    }
}
