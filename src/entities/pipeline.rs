//! Pipelines
//!
//! The single pipeline data source exposes the full pipeline; the list
//! data source a summary of each.

use super::common::{PermissionFamily, PermissionsFields};
use super::{
    computed_bool, computed_int, computed_object, computed_set, computed_string, computed_strings, Fields,
};
use crate::bridge;
use crate::buddy::models::{GitConfig, Pipeline, PipelineEvent, RemoteParameter};
use crate::framework::{Attribute, ObjectBuilder, ObjectReader, Value};

/// Definition source used when the API returns none
pub const DEFAULT_DEFINITION_SOURCE: &str = "LOCAL";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineEventFields {
    pub kind: Value<String>,
    pub refs: Value<Vec<String>>,
}

impl PipelineEventFields {
    pub fn load(dto: &PipelineEvent) -> Self {
        Self {
            kind: bridge::string(&dto.kind),
            refs: bridge::string_set(&dto.refs),
        }
    }
}

impl Fields for PipelineEventFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("type", computed_string("The event type")),
            ("refs", computed_strings("Refs the event fires for")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            kind: r.string("type"),
            refs: r.strings("refs"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("type", &self.kind).strings("refs", &self.refs)
    }
}

nested_object!(PipelineEventFields);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteParameterFields {
    pub key: Value<String>,
    pub value: Value<String>,
}

impl RemoteParameterFields {
    pub fn load(dto: &RemoteParameter) -> Self {
        Self {
            key: bridge::string(&dto.key),
            value: bridge::string(&dto.value),
        }
    }
}

impl Fields for RemoteParameterFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("key", computed_string("Parameter name")),
            ("value", computed_string("Parameter value")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            key: r.string("key"),
            value: r.string("value"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("key", &self.key).string("value", &self.value)
    }
}

nested_object!(RemoteParameterFields);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GitConfigFields {
    pub project: Value<String>,
    pub branch: Value<String>,
    pub path: Value<String>,
}

impl GitConfigFields {
    pub fn load(dto: &GitConfig) -> Self {
        Self {
            project: bridge::string(&dto.project),
            branch: bridge::string(&dto.branch),
            path: bridge::string(&dto.path),
        }
    }
}

impl Fields for GitConfigFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("project", computed_string("Project holding the pipeline definition")),
            ("branch", computed_string("Branch holding the pipeline definition")),
            ("path", computed_string("Path of the pipeline definition")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            project: r.string("project"),
            branch: r.string("branch"),
            path: r.string("path"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.string("project", &self.project)
            .string("branch", &self.branch)
            .string("path", &self.path)
    }
}

nested_object!(GitConfigFields);

/// Full pipeline, as read by the single pipeline data source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineFields {
    pub pipeline_id: Value<i64>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub html_url: Value<String>,
    pub on: Value<String>,
    pub priority: Value<String>,
    pub cpu: Value<String>,
    pub refs: Value<Vec<String>>,
    pub tags: Value<Vec<String>>,
    pub events: Value<Vec<PipelineEventFields>>,
    pub disabled: Value<bool>,
    pub disabling_reason: Value<String>,
    pub last_execution_status: Value<String>,
    pub last_execution_revision: Value<String>,
    pub create_date: Value<String>,
    pub always_from_scratch: Value<bool>,
    pub auto_clear_cache: Value<bool>,
    pub no_skip_to_most_recent: Value<bool>,
    pub do_not_create_commit_status: Value<bool>,
    pub fail_on_prepare_env_warning: Value<bool>,
    pub fetch_all_refs: Value<bool>,
    pub ignore_fail_on_project_status: Value<bool>,
    pub paused: Value<bool>,
    pub concurrent_pipeline_runs: Value<bool>,
    pub clone_depth: Value<i64>,
    pub worker: Value<String>,
    pub folder: Value<String>,
    pub description: Value<String>,
    pub execution_message_template: Value<String>,
    pub target_site_url: Value<String>,
    pub git_changeset_base: Value<String>,
    pub filesystem_changeset_base: Value<String>,
    pub definition_source: Value<String>,
    pub remote_project_name: Value<String>,
    pub remote_branch: Value<String>,
    pub remote_path: Value<String>,
    pub remote_parameters: Value<Vec<RemoteParameterFields>>,
    pub git_config_ref: Value<String>,
    pub git_config: Value<GitConfigFields>,
    pub permissions: Value<PermissionsFields>,
}

impl PipelineFields {
    pub fn load(dto: &Pipeline) -> Self {
        Self {
            pipeline_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            html_url: bridge::string(&dto.html_url),
            on: bridge::string(&dto.on),
            priority: bridge::string(&dto.priority),
            cpu: bridge::string(&dto.cpu),
            refs: bridge::string_set(&dto.refs),
            tags: bridge::string_set(&dto.tags),
            events: bridge::object_set(&dto.events, PipelineEventFields::load),
            disabled: bridge::boolean(dto.disabled),
            disabling_reason: bridge::string(&dto.disabling_reason),
            last_execution_status: bridge::string(&dto.last_execution_status),
            last_execution_revision: bridge::string(&dto.last_execution_revision),
            create_date: bridge::string(&dto.create_date),
            always_from_scratch: bridge::boolean(dto.always_from_scratch),
            auto_clear_cache: bridge::boolean(dto.auto_clear_cache),
            no_skip_to_most_recent: bridge::boolean(dto.no_skip_to_most_recent),
            do_not_create_commit_status: bridge::boolean(dto.do_not_create_commit_status),
            fail_on_prepare_env_warning: bridge::boolean(dto.fail_on_prepare_env_warning),
            fetch_all_refs: bridge::boolean(dto.fetch_all_refs),
            ignore_fail_on_project_status: bridge::boolean(dto.ignore_fail_on_project_status),
            paused: bridge::boolean(dto.paused),
            concurrent_pipeline_runs: bridge::boolean(dto.concurrent_pipeline_runs),
            clone_depth: bridge::int64(dto.clone_depth),
            worker: bridge::string(&dto.worker),
            folder: bridge::string(&dto.folder),
            description: bridge::string(&dto.description),
            execution_message_template: bridge::string(&dto.execution_message_template),
            target_site_url: bridge::string(&dto.target_site_url),
            git_changeset_base: bridge::string(&dto.git_changeset_base),
            filesystem_changeset_base: bridge::string(&dto.filesystem_changeset_base),
            definition_source: bridge::string_or(&dto.definition_source, DEFAULT_DEFINITION_SOURCE),
            remote_project_name: bridge::string(&dto.remote_project_name),
            remote_branch: bridge::string(&dto.remote_branch),
            remote_path: bridge::string(&dto.remote_path),
            remote_parameters: bridge::object_set(&dto.remote_parameters, RemoteParameterFields::load),
            git_config_ref: bridge::string(&dto.git_config_ref),
            git_config: bridge::opt_object(dto.git_config.as_ref(), GitConfigFields::load),
            permissions: PermissionsFields::load_opt(dto.permissions.as_ref(), PermissionFamily::Pipeline),
        }
    }
}

impl Fields for PipelineFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("pipeline_id", computed_int("The pipeline's ID")),
            ("name", computed_string("The pipeline's name")),
            ("identifier", computed_string("The pipeline's identifier")),
            ("html_url", computed_string("The pipeline's URL")),
            ("on", computed_string("The pipeline's trigger mode: CLICK, EVENT or SCHEDULE")),
            ("priority", computed_string("The pipeline's priority")),
            ("cpu", computed_string("The pipeline's CPU architecture")),
            ("refs", computed_strings("Refs the pipeline runs for")),
            ("tags", computed_strings("The pipeline's tags")),
            ("event", computed_set::<PipelineEventFields>("Events that trigger the pipeline")),
            ("disabled", computed_bool("Whether the pipeline is disabled")),
            ("disabling_reason", computed_string("Why the pipeline is disabled")),
            ("last_execution_status", computed_string("Status of the last run")),
            ("last_execution_revision", computed_string("Revision of the last run")),
            ("create_date", computed_string("The pipeline's creation date")),
            ("always_from_scratch", computed_bool("Whether runs upload all files")),
            ("auto_clear_cache", computed_bool("Whether the cache is cleared before each run")),
            ("no_skip_to_most_recent", computed_bool("Whether queued runs are all executed")),
            (
                "do_not_create_commit_status",
                computed_bool("Whether commit statuses are suppressed"),
            ),
            (
                "fail_on_prepare_env_warning",
                computed_bool("Whether environment preparation warnings fail the run"),
            ),
            ("fetch_all_refs", computed_bool("Whether all refs are fetched")),
            (
                "ignore_fail_on_project_status",
                computed_bool("Whether a failed run is ignored in the project status"),
            ),
            ("paused", computed_bool("Whether the pipeline is paused")),
            ("concurrent_pipeline_runs", computed_bool("Whether runs may overlap")),
            ("clone_depth", computed_int("Git clone depth, 0 for full history")),
            ("worker", computed_string("Worker tag the pipeline runs on")),
            ("folder", computed_string("Folder grouping the pipeline")),
            ("description", computed_string("The pipeline's description")),
            ("execution_message_template", computed_string("Run title template")),
            ("target_site_url", computed_string("The pipeline's target site URL")),
            ("git_changeset_base", computed_string("Base of the git changeset")),
            ("filesystem_changeset_base", computed_string("Base of the filesystem changeset")),
            ("definition_source", computed_string("Where the definition lives: LOCAL or REMOTE")),
            ("remote_project_name", computed_string("Project of a remote definition")),
            ("remote_branch", computed_string("Branch of a remote definition")),
            ("remote_path", computed_string("Path of a remote definition")),
            (
                "remote_parameter",
                computed_set::<RemoteParameterFields>("Parameters passed to a remote definition"),
            ),
            ("git_config_ref", computed_string("How the pipeline's git config is resolved")),
            ("git_config", computed_object::<GitConfigFields>("The pipeline's git config")),
            ("permissions", computed_object::<PermissionsFields>("Who may use the pipeline")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            pipeline_id: r.int64("pipeline_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            html_url: r.string("html_url"),
            on: r.string("on"),
            priority: r.string("priority"),
            cpu: r.string("cpu"),
            refs: r.strings("refs"),
            tags: r.strings("tags"),
            events: r.set("event"),
            disabled: r.bool("disabled"),
            disabling_reason: r.string("disabling_reason"),
            last_execution_status: r.string("last_execution_status"),
            last_execution_revision: r.string("last_execution_revision"),
            create_date: r.string("create_date"),
            always_from_scratch: r.bool("always_from_scratch"),
            auto_clear_cache: r.bool("auto_clear_cache"),
            no_skip_to_most_recent: r.bool("no_skip_to_most_recent"),
            do_not_create_commit_status: r.bool("do_not_create_commit_status"),
            fail_on_prepare_env_warning: r.bool("fail_on_prepare_env_warning"),
            fetch_all_refs: r.bool("fetch_all_refs"),
            ignore_fail_on_project_status: r.bool("ignore_fail_on_project_status"),
            paused: r.bool("paused"),
            concurrent_pipeline_runs: r.bool("concurrent_pipeline_runs"),
            clone_depth: r.int64("clone_depth"),
            worker: r.string("worker"),
            folder: r.string("folder"),
            description: r.string("description"),
            execution_message_template: r.string("execution_message_template"),
            target_site_url: r.string("target_site_url"),
            git_changeset_base: r.string("git_changeset_base"),
            filesystem_changeset_base: r.string("filesystem_changeset_base"),
            definition_source: r.string("definition_source"),
            remote_project_name: r.string("remote_project_name"),
            remote_branch: r.string("remote_branch"),
            remote_path: r.string("remote_path"),
            remote_parameters: r.set("remote_parameter"),
            git_config_ref: r.string("git_config_ref"),
            git_config: r.object("git_config"),
            permissions: r.object("permissions"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("pipeline_id", &self.pipeline_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("html_url", &self.html_url)
            .string("on", &self.on)
            .string("priority", &self.priority)
            .string("cpu", &self.cpu)
            .strings("refs", &self.refs)
            .strings("tags", &self.tags)
            .set("event", &self.events)
            .bool("disabled", &self.disabled)
            .string("disabling_reason", &self.disabling_reason)
            .string("last_execution_status", &self.last_execution_status)
            .string("last_execution_revision", &self.last_execution_revision)
            .string("create_date", &self.create_date)
            .bool("always_from_scratch", &self.always_from_scratch)
            .bool("auto_clear_cache", &self.auto_clear_cache)
            .bool("no_skip_to_most_recent", &self.no_skip_to_most_recent)
            .bool("do_not_create_commit_status", &self.do_not_create_commit_status)
            .bool("fail_on_prepare_env_warning", &self.fail_on_prepare_env_warning)
            .bool("fetch_all_refs", &self.fetch_all_refs)
            .bool("ignore_fail_on_project_status", &self.ignore_fail_on_project_status)
            .bool("paused", &self.paused)
            .bool("concurrent_pipeline_runs", &self.concurrent_pipeline_runs)
            .int64("clone_depth", &self.clone_depth)
            .string("worker", &self.worker)
            .string("folder", &self.folder)
            .string("description", &self.description)
            .string("execution_message_template", &self.execution_message_template)
            .string("target_site_url", &self.target_site_url)
            .string("git_changeset_base", &self.git_changeset_base)
            .string("filesystem_changeset_base", &self.filesystem_changeset_base)
            .string("definition_source", &self.definition_source)
            .string("remote_project_name", &self.remote_project_name)
            .string("remote_branch", &self.remote_branch)
            .string("remote_path", &self.remote_path)
            .set("remote_parameter", &self.remote_parameters)
            .string("git_config_ref", &self.git_config_ref)
            .object("git_config", &self.git_config)
            .object("permissions", &self.permissions)
    }
}

nested_object!(PipelineFields);

/// Pipeline as listed by the pipelines data source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineSummaryFields {
    pub pipeline_id: Value<i64>,
    pub name: Value<String>,
    pub identifier: Value<String>,
    pub html_url: Value<String>,
    pub on: Value<String>,
    pub priority: Value<String>,
    pub refs: Value<Vec<String>>,
    pub tags: Value<Vec<String>>,
    pub events: Value<Vec<PipelineEventFields>>,
    pub disabled: Value<bool>,
    pub disabling_reason: Value<String>,
    pub last_execution_status: Value<String>,
    pub last_execution_revision: Value<String>,
    pub folder: Value<String>,
    pub definition_source: Value<String>,
}

impl PipelineSummaryFields {
    pub fn load(dto: &Pipeline) -> Self {
        Self {
            pipeline_id: bridge::int64(dto.id),
            name: bridge::string(&dto.name),
            identifier: bridge::string(&dto.identifier),
            html_url: bridge::string(&dto.html_url),
            on: bridge::string(&dto.on),
            priority: bridge::string(&dto.priority),
            refs: bridge::string_set(&dto.refs),
            tags: bridge::string_set(&dto.tags),
            events: bridge::object_set(&dto.events, PipelineEventFields::load),
            disabled: bridge::boolean(dto.disabled),
            disabling_reason: bridge::string(&dto.disabling_reason),
            last_execution_status: bridge::string(&dto.last_execution_status),
            last_execution_revision: bridge::string(&dto.last_execution_revision),
            folder: bridge::string(&dto.folder),
            definition_source: bridge::string_or(&dto.definition_source, DEFAULT_DEFINITION_SOURCE),
        }
    }
}

impl Fields for PipelineSummaryFields {
    fn attributes() -> Vec<(&'static str, Attribute)> {
        vec![
            ("pipeline_id", computed_int("The pipeline's ID")),
            ("name", computed_string("The pipeline's name")),
            ("identifier", computed_string("The pipeline's identifier")),
            ("html_url", computed_string("The pipeline's URL")),
            ("on", computed_string("The pipeline's trigger mode")),
            ("priority", computed_string("The pipeline's priority")),
            ("refs", computed_strings("Refs the pipeline runs for")),
            ("tags", computed_strings("The pipeline's tags")),
            ("event", computed_set::<PipelineEventFields>("Events that trigger the pipeline")),
            ("disabled", computed_bool("Whether the pipeline is disabled")),
            ("disabling_reason", computed_string("Why the pipeline is disabled")),
            ("last_execution_status", computed_string("Status of the last run")),
            ("last_execution_revision", computed_string("Revision of the last run")),
            ("folder", computed_string("Folder grouping the pipeline")),
            ("definition_source", computed_string("Where the definition lives")),
        ]
    }

    fn read(r: &mut ObjectReader<'_>) -> Self {
        Self {
            pipeline_id: r.int64("pipeline_id"),
            name: r.string("name"),
            identifier: r.string("identifier"),
            html_url: r.string("html_url"),
            on: r.string("on"),
            priority: r.string("priority"),
            refs: r.strings("refs"),
            tags: r.strings("tags"),
            events: r.set("event"),
            disabled: r.bool("disabled"),
            disabling_reason: r.string("disabling_reason"),
            last_execution_status: r.string("last_execution_status"),
            last_execution_revision: r.string("last_execution_revision"),
            folder: r.string("folder"),
            definition_source: r.string("definition_source"),
        }
    }

    fn write(&self, b: ObjectBuilder) -> ObjectBuilder {
        b.int64("pipeline_id", &self.pipeline_id)
            .string("name", &self.name)
            .string("identifier", &self.identifier)
            .string("html_url", &self.html_url)
            .string("on", &self.on)
            .string("priority", &self.priority)
            .strings("refs", &self.refs)
            .strings("tags", &self.tags)
            .set("event", &self.events)
            .bool("disabled", &self.disabled)
            .string("disabling_reason", &self.disabling_reason)
            .string("last_execution_status", &self.last_execution_status)
            .string("last_execution_revision", &self.last_execution_revision)
            .string("folder", &self.folder)
            .string("definition_source", &self.definition_source)
    }
}

nested_object!(PipelineSummaryFields);
