// This file is generated by `autogen` from vk.xml header version 281. Do not edit by hand.

#[allow(unused_imports)]
use ash::vk;
#[allow(unused_imports)]
use std::ffi::{c_char, c_void};

vulkan_commands! {
    instance {
        #[manual]
        DestroyInstance = "vkDestroyInstance" => destroy_instance {
            pre_call_validate_destroy_instance,
            pre_call_record_destroy_instance,
            post_call_record_destroy_instance,
        } (
            instance: vk::Instance,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        EnumeratePhysicalDevices = "vkEnumeratePhysicalDevices" => enumerate_physical_devices {
            pre_call_validate_enumerate_physical_devices,
            pre_call_record_enumerate_physical_devices,
            post_call_record_enumerate_physical_devices,
        } (
            instance: vk::Instance,
            p_physical_device_count: *mut u32,
            p_physical_devices: *mut vk::PhysicalDevice,
        ) -> vk::Result;
        GetPhysicalDeviceProperties = "vkGetPhysicalDeviceProperties" => get_physical_device_properties {
            pre_call_validate_get_physical_device_properties,
            pre_call_record_get_physical_device_properties,
            post_call_record_get_physical_device_properties,
        } (
            physical_device: vk::PhysicalDevice,
            p_properties: *mut vk::PhysicalDeviceProperties,
        );
        GetPhysicalDeviceFeatures = "vkGetPhysicalDeviceFeatures" => get_physical_device_features {
            pre_call_validate_get_physical_device_features,
            pre_call_record_get_physical_device_features,
            post_call_record_get_physical_device_features,
        } (
            physical_device: vk::PhysicalDevice,
            p_features: *mut vk::PhysicalDeviceFeatures,
        );
        GetPhysicalDeviceQueueFamilyProperties = "vkGetPhysicalDeviceQueueFamilyProperties" => get_physical_device_queue_family_properties {
            pre_call_validate_get_physical_device_queue_family_properties,
            pre_call_record_get_physical_device_queue_family_properties,
            post_call_record_get_physical_device_queue_family_properties,
        } (
            physical_device: vk::PhysicalDevice,
            p_queue_family_property_count: *mut u32,
            p_queue_family_properties: *mut vk::QueueFamilyProperties,
        );
        GetPhysicalDeviceMemoryProperties = "vkGetPhysicalDeviceMemoryProperties" => get_physical_device_memory_properties {
            pre_call_validate_get_physical_device_memory_properties,
            pre_call_record_get_physical_device_memory_properties,
            post_call_record_get_physical_device_memory_properties,
        } (
            physical_device: vk::PhysicalDevice,
            p_memory_properties: *mut vk::PhysicalDeviceMemoryProperties,
        );
        #[manual]
        CreateDevice = "vkCreateDevice" => create_device {
            pre_call_validate_create_device,
            pre_call_record_create_device,
            post_call_record_create_device,
        } (
            physical_device: vk::PhysicalDevice,
            p_create_info: *const vk::DeviceCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_device: *mut vk::Device,
        ) -> vk::Result;
        CreateDebugUtilsMessengerEXT = "vkCreateDebugUtilsMessengerEXT" => create_debug_utils_messenger_ext {
            pre_call_validate_create_debug_utils_messenger_ext,
            pre_call_record_create_debug_utils_messenger_ext,
            post_call_record_create_debug_utils_messenger_ext,
        } (
            instance: vk::Instance,
            p_create_info: *const vk::DebugUtilsMessengerCreateInfoEXT<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_messenger: *mut vk::DebugUtilsMessengerEXT,
        ) -> vk::Result;
        DestroyDebugUtilsMessengerEXT = "vkDestroyDebugUtilsMessengerEXT" => destroy_debug_utils_messenger_ext {
            pre_call_validate_destroy_debug_utils_messenger_ext,
            pre_call_record_destroy_debug_utils_messenger_ext,
            post_call_record_destroy_debug_utils_messenger_ext,
        } (
            instance: vk::Instance,
            messenger: vk::DebugUtilsMessengerEXT,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
    }

    device {
        #[manual]
        DestroyDevice = "vkDestroyDevice" => destroy_device {
            pre_call_validate_destroy_device,
            pre_call_record_destroy_device,
            post_call_record_destroy_device,
        } (
            device: vk::Device,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        GetDeviceQueue = "vkGetDeviceQueue" => get_device_queue {
            pre_call_validate_get_device_queue,
            pre_call_record_get_device_queue,
            post_call_record_get_device_queue,
        } (
            device: vk::Device,
            queue_family_index: u32,
            queue_index: u32,
            p_queue: *mut vk::Queue,
        );
        DeviceWaitIdle = "vkDeviceWaitIdle" => device_wait_idle {
            pre_call_validate_device_wait_idle,
            pre_call_record_device_wait_idle,
            post_call_record_device_wait_idle,
        } (
            device: vk::Device,
        ) -> vk::Result;
        QueueSubmit = "vkQueueSubmit" => queue_submit {
            pre_call_validate_queue_submit,
            pre_call_record_queue_submit,
            post_call_record_queue_submit,
        } (
            queue: vk::Queue,
            submit_count: u32,
            p_submits: *const vk::SubmitInfo<'_>,
            fence: vk::Fence,
        ) -> vk::Result;
        QueueWaitIdle = "vkQueueWaitIdle" => queue_wait_idle {
            pre_call_validate_queue_wait_idle,
            pre_call_record_queue_wait_idle,
            post_call_record_queue_wait_idle,
        } (
            queue: vk::Queue,
        ) -> vk::Result;
        AllocateMemory = "vkAllocateMemory" => allocate_memory {
            pre_call_validate_allocate_memory,
            pre_call_record_allocate_memory,
            post_call_record_allocate_memory,
        } (
            device: vk::Device,
            p_allocate_info: *const vk::MemoryAllocateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_memory: *mut vk::DeviceMemory,
        ) -> vk::Result;
        FreeMemory = "vkFreeMemory" => free_memory {
            pre_call_validate_free_memory,
            pre_call_record_free_memory,
            post_call_record_free_memory,
        } (
            device: vk::Device,
            memory: vk::DeviceMemory,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        MapMemory = "vkMapMemory" => map_memory {
            pre_call_validate_map_memory,
            pre_call_record_map_memory,
            post_call_record_map_memory,
        } (
            device: vk::Device,
            memory: vk::DeviceMemory,
            offset: vk::DeviceSize,
            size: vk::DeviceSize,
            flags: vk::MemoryMapFlags,
            pp_data: *mut *mut c_void,
        ) -> vk::Result;
        UnmapMemory = "vkUnmapMemory" => unmap_memory {
            pre_call_validate_unmap_memory,
            pre_call_record_unmap_memory,
            post_call_record_unmap_memory,
        } (
            device: vk::Device,
            memory: vk::DeviceMemory,
        );
        CreateBuffer = "vkCreateBuffer" => create_buffer {
            pre_call_validate_create_buffer,
            pre_call_record_create_buffer,
            post_call_record_create_buffer,
        } (
            device: vk::Device,
            p_create_info: *const vk::BufferCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_buffer: *mut vk::Buffer,
        ) -> vk::Result;
        DestroyBuffer = "vkDestroyBuffer" => destroy_buffer {
            pre_call_validate_destroy_buffer,
            pre_call_record_destroy_buffer,
            post_call_record_destroy_buffer,
        } (
            device: vk::Device,
            buffer: vk::Buffer,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        BindBufferMemory = "vkBindBufferMemory" => bind_buffer_memory {
            pre_call_validate_bind_buffer_memory,
            pre_call_record_bind_buffer_memory,
            post_call_record_bind_buffer_memory,
        } (
            device: vk::Device,
            buffer: vk::Buffer,
            memory: vk::DeviceMemory,
            memory_offset: vk::DeviceSize,
        ) -> vk::Result;
        GetBufferMemoryRequirements = "vkGetBufferMemoryRequirements" => get_buffer_memory_requirements {
            pre_call_validate_get_buffer_memory_requirements,
            pre_call_record_get_buffer_memory_requirements,
            post_call_record_get_buffer_memory_requirements,
        } (
            device: vk::Device,
            buffer: vk::Buffer,
            p_memory_requirements: *mut vk::MemoryRequirements,
        );
        CreateImage = "vkCreateImage" => create_image {
            pre_call_validate_create_image,
            pre_call_record_create_image,
            post_call_record_create_image,
        } (
            device: vk::Device,
            p_create_info: *const vk::ImageCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_image: *mut vk::Image,
        ) -> vk::Result;
        DestroyImage = "vkDestroyImage" => destroy_image {
            pre_call_validate_destroy_image,
            pre_call_record_destroy_image,
            post_call_record_destroy_image,
        } (
            device: vk::Device,
            image: vk::Image,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        BindImageMemory = "vkBindImageMemory" => bind_image_memory {
            pre_call_validate_bind_image_memory,
            pre_call_record_bind_image_memory,
            post_call_record_bind_image_memory,
        } (
            device: vk::Device,
            image: vk::Image,
            memory: vk::DeviceMemory,
            memory_offset: vk::DeviceSize,
        ) -> vk::Result;
        GetImageMemoryRequirements = "vkGetImageMemoryRequirements" => get_image_memory_requirements {
            pre_call_validate_get_image_memory_requirements,
            pre_call_record_get_image_memory_requirements,
            post_call_record_get_image_memory_requirements,
        } (
            device: vk::Device,
            image: vk::Image,
            p_memory_requirements: *mut vk::MemoryRequirements,
        );
        CreateImageView = "vkCreateImageView" => create_image_view {
            pre_call_validate_create_image_view,
            pre_call_record_create_image_view,
            post_call_record_create_image_view,
        } (
            device: vk::Device,
            p_create_info: *const vk::ImageViewCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_view: *mut vk::ImageView,
        ) -> vk::Result;
        DestroyImageView = "vkDestroyImageView" => destroy_image_view {
            pre_call_validate_destroy_image_view,
            pre_call_record_destroy_image_view,
            post_call_record_destroy_image_view,
        } (
            device: vk::Device,
            image_view: vk::ImageView,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateFence = "vkCreateFence" => create_fence {
            pre_call_validate_create_fence,
            pre_call_record_create_fence,
            post_call_record_create_fence,
        } (
            device: vk::Device,
            p_create_info: *const vk::FenceCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_fence: *mut vk::Fence,
        ) -> vk::Result;
        DestroyFence = "vkDestroyFence" => destroy_fence {
            pre_call_validate_destroy_fence,
            pre_call_record_destroy_fence,
            post_call_record_destroy_fence,
        } (
            device: vk::Device,
            fence: vk::Fence,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        ResetFences = "vkResetFences" => reset_fences {
            pre_call_validate_reset_fences,
            pre_call_record_reset_fences,
            post_call_record_reset_fences,
        } (
            device: vk::Device,
            fence_count: u32,
            p_fences: *const vk::Fence,
        ) -> vk::Result;
        GetFenceStatus = "vkGetFenceStatus" => get_fence_status {
            pre_call_validate_get_fence_status,
            pre_call_record_get_fence_status,
            post_call_record_get_fence_status,
        } (
            device: vk::Device,
            fence: vk::Fence,
        ) -> vk::Result;
        WaitForFences = "vkWaitForFences" => wait_for_fences {
            pre_call_validate_wait_for_fences,
            pre_call_record_wait_for_fences,
            post_call_record_wait_for_fences,
        } (
            device: vk::Device,
            fence_count: u32,
            p_fences: *const vk::Fence,
            wait_all: vk::Bool32,
            timeout: u64,
        ) -> vk::Result;
        CreateSemaphore = "vkCreateSemaphore" => create_semaphore {
            pre_call_validate_create_semaphore,
            pre_call_record_create_semaphore,
            post_call_record_create_semaphore,
        } (
            device: vk::Device,
            p_create_info: *const vk::SemaphoreCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_semaphore: *mut vk::Semaphore,
        ) -> vk::Result;
        DestroySemaphore = "vkDestroySemaphore" => destroy_semaphore {
            pre_call_validate_destroy_semaphore,
            pre_call_record_destroy_semaphore,
            post_call_record_destroy_semaphore,
        } (
            device: vk::Device,
            semaphore: vk::Semaphore,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateShaderModule = "vkCreateShaderModule" => create_shader_module {
            pre_call_validate_create_shader_module,
            pre_call_record_create_shader_module,
            post_call_record_create_shader_module,
        } (
            device: vk::Device,
            p_create_info: *const vk::ShaderModuleCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_shader_module: *mut vk::ShaderModule,
        ) -> vk::Result;
        DestroyShaderModule = "vkDestroyShaderModule" => destroy_shader_module {
            pre_call_validate_destroy_shader_module,
            pre_call_record_destroy_shader_module,
            post_call_record_destroy_shader_module,
        } (
            device: vk::Device,
            shader_module: vk::ShaderModule,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreatePipelineLayout = "vkCreatePipelineLayout" => create_pipeline_layout {
            pre_call_validate_create_pipeline_layout,
            pre_call_record_create_pipeline_layout,
            post_call_record_create_pipeline_layout,
        } (
            device: vk::Device,
            p_create_info: *const vk::PipelineLayoutCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_pipeline_layout: *mut vk::PipelineLayout,
        ) -> vk::Result;
        DestroyPipelineLayout = "vkDestroyPipelineLayout" => destroy_pipeline_layout {
            pre_call_validate_destroy_pipeline_layout,
            pre_call_record_destroy_pipeline_layout,
            post_call_record_destroy_pipeline_layout,
        } (
            device: vk::Device,
            pipeline_layout: vk::PipelineLayout,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateGraphicsPipelines = "vkCreateGraphicsPipelines" => create_graphics_pipelines {
            pre_call_validate_create_graphics_pipelines,
            pre_call_record_create_graphics_pipelines,
            post_call_record_create_graphics_pipelines,
        } (
            device: vk::Device,
            pipeline_cache: vk::PipelineCache,
            create_info_count: u32,
            p_create_infos: *const vk::GraphicsPipelineCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_pipelines: *mut vk::Pipeline,
        ) -> vk::Result;
        CreateComputePipelines = "vkCreateComputePipelines" => create_compute_pipelines {
            pre_call_validate_create_compute_pipelines,
            pre_call_record_create_compute_pipelines,
            post_call_record_create_compute_pipelines,
        } (
            device: vk::Device,
            pipeline_cache: vk::PipelineCache,
            create_info_count: u32,
            p_create_infos: *const vk::ComputePipelineCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_pipelines: *mut vk::Pipeline,
        ) -> vk::Result;
        DestroyPipeline = "vkDestroyPipeline" => destroy_pipeline {
            pre_call_validate_destroy_pipeline,
            pre_call_record_destroy_pipeline,
            post_call_record_destroy_pipeline,
        } (
            device: vk::Device,
            pipeline: vk::Pipeline,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateDescriptorSetLayout = "vkCreateDescriptorSetLayout" => create_descriptor_set_layout {
            pre_call_validate_create_descriptor_set_layout,
            pre_call_record_create_descriptor_set_layout,
            post_call_record_create_descriptor_set_layout,
        } (
            device: vk::Device,
            p_create_info: *const vk::DescriptorSetLayoutCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_set_layout: *mut vk::DescriptorSetLayout,
        ) -> vk::Result;
        DestroyDescriptorSetLayout = "vkDestroyDescriptorSetLayout" => destroy_descriptor_set_layout {
            pre_call_validate_destroy_descriptor_set_layout,
            pre_call_record_destroy_descriptor_set_layout,
            post_call_record_destroy_descriptor_set_layout,
        } (
            device: vk::Device,
            descriptor_set_layout: vk::DescriptorSetLayout,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateDescriptorPool = "vkCreateDescriptorPool" => create_descriptor_pool {
            pre_call_validate_create_descriptor_pool,
            pre_call_record_create_descriptor_pool,
            post_call_record_create_descriptor_pool,
        } (
            device: vk::Device,
            p_create_info: *const vk::DescriptorPoolCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_descriptor_pool: *mut vk::DescriptorPool,
        ) -> vk::Result;
        DestroyDescriptorPool = "vkDestroyDescriptorPool" => destroy_descriptor_pool {
            pre_call_validate_destroy_descriptor_pool,
            pre_call_record_destroy_descriptor_pool,
            post_call_record_destroy_descriptor_pool,
        } (
            device: vk::Device,
            descriptor_pool: vk::DescriptorPool,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        ResetDescriptorPool = "vkResetDescriptorPool" => reset_descriptor_pool {
            pre_call_validate_reset_descriptor_pool,
            pre_call_record_reset_descriptor_pool,
            post_call_record_reset_descriptor_pool,
        } (
            device: vk::Device,
            descriptor_pool: vk::DescriptorPool,
            flags: vk::DescriptorPoolResetFlags,
        ) -> vk::Result;
        AllocateDescriptorSets = "vkAllocateDescriptorSets" => allocate_descriptor_sets {
            pre_call_validate_allocate_descriptor_sets,
            pre_call_record_allocate_descriptor_sets,
            post_call_record_allocate_descriptor_sets,
        } (
            device: vk::Device,
            p_allocate_info: *const vk::DescriptorSetAllocateInfo<'_>,
            p_descriptor_sets: *mut vk::DescriptorSet,
        ) -> vk::Result;
        FreeDescriptorSets = "vkFreeDescriptorSets" => free_descriptor_sets {
            pre_call_validate_free_descriptor_sets,
            pre_call_record_free_descriptor_sets,
            post_call_record_free_descriptor_sets,
        } (
            device: vk::Device,
            descriptor_pool: vk::DescriptorPool,
            descriptor_set_count: u32,
            p_descriptor_sets: *const vk::DescriptorSet,
        ) -> vk::Result;
        CreateRenderPass = "vkCreateRenderPass" => create_render_pass {
            pre_call_validate_create_render_pass,
            pre_call_record_create_render_pass,
            post_call_record_create_render_pass,
        } (
            device: vk::Device,
            p_create_info: *const vk::RenderPassCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_render_pass: *mut vk::RenderPass,
        ) -> vk::Result;
        DestroyRenderPass = "vkDestroyRenderPass" => destroy_render_pass {
            pre_call_validate_destroy_render_pass,
            pre_call_record_destroy_render_pass,
            post_call_record_destroy_render_pass,
        } (
            device: vk::Device,
            render_pass: vk::RenderPass,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateFramebuffer = "vkCreateFramebuffer" => create_framebuffer {
            pre_call_validate_create_framebuffer,
            pre_call_record_create_framebuffer,
            post_call_record_create_framebuffer,
        } (
            device: vk::Device,
            p_create_info: *const vk::FramebufferCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_framebuffer: *mut vk::Framebuffer,
        ) -> vk::Result;
        DestroyFramebuffer = "vkDestroyFramebuffer" => destroy_framebuffer {
            pre_call_validate_destroy_framebuffer,
            pre_call_record_destroy_framebuffer,
            post_call_record_destroy_framebuffer,
        } (
            device: vk::Device,
            framebuffer: vk::Framebuffer,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CreateCommandPool = "vkCreateCommandPool" => create_command_pool {
            pre_call_validate_create_command_pool,
            pre_call_record_create_command_pool,
            post_call_record_create_command_pool,
        } (
            device: vk::Device,
            p_create_info: *const vk::CommandPoolCreateInfo<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_command_pool: *mut vk::CommandPool,
        ) -> vk::Result;
        DestroyCommandPool = "vkDestroyCommandPool" => destroy_command_pool {
            pre_call_validate_destroy_command_pool,
            pre_call_record_destroy_command_pool,
            post_call_record_destroy_command_pool,
        } (
            device: vk::Device,
            command_pool: vk::CommandPool,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        ResetCommandPool = "vkResetCommandPool" => reset_command_pool {
            pre_call_validate_reset_command_pool,
            pre_call_record_reset_command_pool,
            post_call_record_reset_command_pool,
        } (
            device: vk::Device,
            command_pool: vk::CommandPool,
            flags: vk::CommandPoolResetFlags,
        ) -> vk::Result;
        AllocateCommandBuffers = "vkAllocateCommandBuffers" => allocate_command_buffers {
            pre_call_validate_allocate_command_buffers,
            pre_call_record_allocate_command_buffers,
            post_call_record_allocate_command_buffers,
        } (
            device: vk::Device,
            p_allocate_info: *const vk::CommandBufferAllocateInfo<'_>,
            p_command_buffers: *mut vk::CommandBuffer,
        ) -> vk::Result;
        FreeCommandBuffers = "vkFreeCommandBuffers" => free_command_buffers {
            pre_call_validate_free_command_buffers,
            pre_call_record_free_command_buffers,
            post_call_record_free_command_buffers,
        } (
            device: vk::Device,
            command_pool: vk::CommandPool,
            command_buffer_count: u32,
            p_command_buffers: *const vk::CommandBuffer,
        );
        BeginCommandBuffer = "vkBeginCommandBuffer" => begin_command_buffer {
            pre_call_validate_begin_command_buffer,
            pre_call_record_begin_command_buffer,
            post_call_record_begin_command_buffer,
        } (
            command_buffer: vk::CommandBuffer,
            p_begin_info: *const vk::CommandBufferBeginInfo<'_>,
        ) -> vk::Result;
        EndCommandBuffer = "vkEndCommandBuffer" => end_command_buffer {
            pre_call_validate_end_command_buffer,
            pre_call_record_end_command_buffer,
            post_call_record_end_command_buffer,
        } (
            command_buffer: vk::CommandBuffer,
        ) -> vk::Result;
        ResetCommandBuffer = "vkResetCommandBuffer" => reset_command_buffer {
            pre_call_validate_reset_command_buffer,
            pre_call_record_reset_command_buffer,
            post_call_record_reset_command_buffer,
        } (
            command_buffer: vk::CommandBuffer,
            flags: vk::CommandBufferResetFlags,
        ) -> vk::Result;
        CmdBindPipeline = "vkCmdBindPipeline" => cmd_bind_pipeline {
            pre_call_validate_cmd_bind_pipeline,
            pre_call_record_cmd_bind_pipeline,
            post_call_record_cmd_bind_pipeline,
        } (
            command_buffer: vk::CommandBuffer,
            pipeline_bind_point: vk::PipelineBindPoint,
            pipeline: vk::Pipeline,
        );
        CmdBindDescriptorSets = "vkCmdBindDescriptorSets" => cmd_bind_descriptor_sets {
            pre_call_validate_cmd_bind_descriptor_sets,
            pre_call_record_cmd_bind_descriptor_sets,
            post_call_record_cmd_bind_descriptor_sets,
        } (
            command_buffer: vk::CommandBuffer,
            pipeline_bind_point: vk::PipelineBindPoint,
            layout: vk::PipelineLayout,
            first_set: u32,
            descriptor_set_count: u32,
            p_descriptor_sets: *const vk::DescriptorSet,
            dynamic_offset_count: u32,
            p_dynamic_offsets: *const u32,
        );
        CmdBindVertexBuffers = "vkCmdBindVertexBuffers" => cmd_bind_vertex_buffers {
            pre_call_validate_cmd_bind_vertex_buffers,
            pre_call_record_cmd_bind_vertex_buffers,
            post_call_record_cmd_bind_vertex_buffers,
        } (
            command_buffer: vk::CommandBuffer,
            first_binding: u32,
            binding_count: u32,
            p_buffers: *const vk::Buffer,
            p_offsets: *const vk::DeviceSize,
        );
        CmdBindIndexBuffer = "vkCmdBindIndexBuffer" => cmd_bind_index_buffer {
            pre_call_validate_cmd_bind_index_buffer,
            pre_call_record_cmd_bind_index_buffer,
            post_call_record_cmd_bind_index_buffer,
        } (
            command_buffer: vk::CommandBuffer,
            buffer: vk::Buffer,
            offset: vk::DeviceSize,
            index_type: vk::IndexType,
        );
        CmdSetViewport = "vkCmdSetViewport" => cmd_set_viewport {
            pre_call_validate_cmd_set_viewport,
            pre_call_record_cmd_set_viewport,
            post_call_record_cmd_set_viewport,
        } (
            command_buffer: vk::CommandBuffer,
            first_viewport: u32,
            viewport_count: u32,
            p_viewports: *const vk::Viewport,
        );
        CmdSetScissor = "vkCmdSetScissor" => cmd_set_scissor {
            pre_call_validate_cmd_set_scissor,
            pre_call_record_cmd_set_scissor,
            post_call_record_cmd_set_scissor,
        } (
            command_buffer: vk::CommandBuffer,
            first_scissor: u32,
            scissor_count: u32,
            p_scissors: *const vk::Rect2D,
        );
        CmdDraw = "vkCmdDraw" => cmd_draw {
            pre_call_validate_cmd_draw,
            pre_call_record_cmd_draw,
            post_call_record_cmd_draw,
        } (
            command_buffer: vk::CommandBuffer,
            vertex_count: u32,
            instance_count: u32,
            first_vertex: u32,
            first_instance: u32,
        );
        CmdDrawIndexed = "vkCmdDrawIndexed" => cmd_draw_indexed {
            pre_call_validate_cmd_draw_indexed,
            pre_call_record_cmd_draw_indexed,
            post_call_record_cmd_draw_indexed,
        } (
            command_buffer: vk::CommandBuffer,
            index_count: u32,
            instance_count: u32,
            first_index: u32,
            vertex_offset: i32,
            first_instance: u32,
        );
        CmdDispatch = "vkCmdDispatch" => cmd_dispatch {
            pre_call_validate_cmd_dispatch,
            pre_call_record_cmd_dispatch,
            post_call_record_cmd_dispatch,
        } (
            command_buffer: vk::CommandBuffer,
            group_count_x: u32,
            group_count_y: u32,
            group_count_z: u32,
        );
        CmdCopyBuffer = "vkCmdCopyBuffer" => cmd_copy_buffer {
            pre_call_validate_cmd_copy_buffer,
            pre_call_record_cmd_copy_buffer,
            post_call_record_cmd_copy_buffer,
        } (
            command_buffer: vk::CommandBuffer,
            src_buffer: vk::Buffer,
            dst_buffer: vk::Buffer,
            region_count: u32,
            p_regions: *const vk::BufferCopy,
        );
        CmdFillBuffer = "vkCmdFillBuffer" => cmd_fill_buffer {
            pre_call_validate_cmd_fill_buffer,
            pre_call_record_cmd_fill_buffer,
            post_call_record_cmd_fill_buffer,
        } (
            command_buffer: vk::CommandBuffer,
            dst_buffer: vk::Buffer,
            dst_offset: vk::DeviceSize,
            size: vk::DeviceSize,
            data: u32,
        );
        CmdPipelineBarrier = "vkCmdPipelineBarrier" => cmd_pipeline_barrier {
            pre_call_validate_cmd_pipeline_barrier,
            pre_call_record_cmd_pipeline_barrier,
            post_call_record_cmd_pipeline_barrier,
        } (
            command_buffer: vk::CommandBuffer,
            src_stage_mask: vk::PipelineStageFlags,
            dst_stage_mask: vk::PipelineStageFlags,
            dependency_flags: vk::DependencyFlags,
            memory_barrier_count: u32,
            p_memory_barriers: *const vk::MemoryBarrier<'_>,
            buffer_memory_barrier_count: u32,
            p_buffer_memory_barriers: *const vk::BufferMemoryBarrier<'_>,
            image_memory_barrier_count: u32,
            p_image_memory_barriers: *const vk::ImageMemoryBarrier<'_>,
        );
        CmdBeginRenderPass = "vkCmdBeginRenderPass" => cmd_begin_render_pass {
            pre_call_validate_cmd_begin_render_pass,
            pre_call_record_cmd_begin_render_pass,
            post_call_record_cmd_begin_render_pass,
        } (
            command_buffer: vk::CommandBuffer,
            p_render_pass_begin: *const vk::RenderPassBeginInfo<'_>,
            contents: vk::SubpassContents,
        );
        CmdNextSubpass = "vkCmdNextSubpass" => cmd_next_subpass {
            pre_call_validate_cmd_next_subpass,
            pre_call_record_cmd_next_subpass,
            post_call_record_cmd_next_subpass,
        } (
            command_buffer: vk::CommandBuffer,
            contents: vk::SubpassContents,
        );
        CmdEndRenderPass = "vkCmdEndRenderPass" => cmd_end_render_pass {
            pre_call_validate_cmd_end_render_pass,
            pre_call_record_cmd_end_render_pass,
            post_call_record_cmd_end_render_pass,
        } (
            command_buffer: vk::CommandBuffer,
        );
        CmdBeginRendering = "vkCmdBeginRendering" => cmd_begin_rendering {
            pre_call_validate_cmd_begin_rendering,
            pre_call_record_cmd_begin_rendering,
            post_call_record_cmd_begin_rendering,
        } (
            command_buffer: vk::CommandBuffer,
            p_rendering_info: *const vk::RenderingInfo<'_>,
        );
        CmdEndRendering = "vkCmdEndRendering" => cmd_end_rendering {
            pre_call_validate_cmd_end_rendering,
            pre_call_record_cmd_end_rendering,
            post_call_record_cmd_end_rendering,
        } (
            command_buffer: vk::CommandBuffer,
        );
        CmdExecuteCommands = "vkCmdExecuteCommands" => cmd_execute_commands {
            pre_call_validate_cmd_execute_commands,
            pre_call_record_cmd_execute_commands,
            post_call_record_cmd_execute_commands,
        } (
            command_buffer: vk::CommandBuffer,
            command_buffer_count: u32,
            p_command_buffers: *const vk::CommandBuffer,
        );
        CreateShadersEXT = "vkCreateShadersEXT" => create_shaders_ext {
            pre_call_validate_create_shaders_ext,
            pre_call_record_create_shaders_ext,
            post_call_record_create_shaders_ext,
        } (
            device: vk::Device,
            create_info_count: u32,
            p_create_infos: *const vk::ShaderCreateInfoEXT<'_>,
            p_allocator: *const vk::AllocationCallbacks<'_>,
            p_shaders: *mut vk::ShaderEXT,
        ) -> vk::Result;
        DestroyShaderEXT = "vkDestroyShaderEXT" => destroy_shader_ext {
            pre_call_validate_destroy_shader_ext,
            pre_call_record_destroy_shader_ext,
            post_call_record_destroy_shader_ext,
        } (
            device: vk::Device,
            shader: vk::ShaderEXT,
            p_allocator: *const vk::AllocationCallbacks<'_>,
        );
        CmdBindShadersEXT = "vkCmdBindShadersEXT" => cmd_bind_shaders_ext {
            pre_call_validate_cmd_bind_shaders_ext,
            pre_call_record_cmd_bind_shaders_ext,
            post_call_record_cmd_bind_shaders_ext,
        } (
            command_buffer: vk::CommandBuffer,
            stage_count: u32,
            p_stages: *const vk::ShaderStageFlags,
            p_shaders: *const vk::ShaderEXT,
        );
    }
}
