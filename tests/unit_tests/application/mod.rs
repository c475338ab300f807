mod document_profiler_test;
mod job_orchestrator_test;
mod result_merger_test;
